use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sales_dashboard::analysis;
use sales_dashboard::enrichment;
use sales_dashboard::models::{Config, DataSource};
use sales_dashboard::ui::{self, components::format_month_point, components::format_won};
use sales_dashboard::{DashboardResult, EnrichedTable};

#[derive(Parser, Debug)]
#[command(name = "sales-dashboard", version, about = "Monthly sales CSV dashboard")]
struct Cli {
    /// CSV with columns 월,매출액,전년동월[,증감률]
    #[arg(short, long, value_name = "CSV", global = true)]
    file: Option<PathBuf>,

    /// Do not fall back to the built-in sample data
    #[arg(long, global = true)]
    no_sample: bool,

    /// KPI revenue target in won
    #[arg(short, long, value_name = "KRW", global = true)]
    target: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Interactive terminal dashboard (default)
    Dashboard,
    /// Print headline metrics
    Summary {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the enriched table as CSV
    Export {
        /// Output path, stdout if omitted
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("⚠️ Logging was already initialised");
    }
}

fn load_table(source: &DataSource) -> DashboardResult<EnrichedTable> {
    let bytes = source.load_bytes()?;
    enrichment::enrich(&bytes)
}

fn print_summary(table: &EnrichedTable, source: &DataSource, target: u64, json: bool) -> Result<()> {
    let summary = analysis::summarize(table);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let on_target = analysis::kpi_achievement(table, target)
        .iter()
        .filter(|p| p.rate_pct.is_some_and(|r| r >= 100.0))
        .count();
    let mean = summary
        .mean_yoy_pct
        .map(|pct| format!("{:.1}%", pct))
        .unwrap_or_else(|| "-".to_string());

    println!("📊 Monthly sales summary ({})", source.label());
    println!("{}", "=".repeat(50));
    println!("  Total revenue:       {}", format_won(summary.total_revenue));
    println!("  Average YoY change:  {}", mean);
    println!("  Best month:          {}", format_month_point(summary.best_month.as_ref()));
    println!("  Worst month:         {}", format_month_point(summary.worst_month.as_ref()));
    println!("  Months:              {}", summary.record_count);
    println!(
        "  KPI target:          {} ({} of {} months on target)",
        format_won(target as f64),
        on_target,
        summary.record_count
    );
    Ok(())
}

fn export_table(table: &EnrichedTable, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            enrichment::write_table(table, file)?;
            info!("Wrote {} rows to {}", table.len(), path.display());
        }
        None => enrichment::write_table(table, io::stdout().lock())?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let command = cli.command.clone().unwrap_or(Commands::Dashboard);

    // Keep the terminal clean while the dashboard owns it
    if matches!(command, Commands::Dashboard) {
        init_logging("sales_dashboard=error");
    } else {
        init_logging(&config.log_filter);
    }

    let file = cli.file.or_else(|| config.csv_path.clone());
    let target = cli.target.unwrap_or(config.kpi_target);
    let use_sample = !cli.no_sample;

    if let Commands::Dashboard = command {
        return ui::run_app(&config, file, use_sample, target);
    }

    let Some(source) = DataSource::select(file, use_sample) else {
        println!("ℹ️ No data to show: pass --file <CSV> or drop --no-sample to use the sample data.");
        return Ok(());
    };
    info!("Loading sales data from {}", source.label());
    let table = match load_table(&source) {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to load {}: {}", source.label(), e);
            eprintln!("❌ {}", e.user_message());
            std::process::exit(1);
        }
    };

    match command {
        Commands::Summary { json } => print_summary(&table, &source, target, json),
        Commands::Export { output } => export_table(&table, output.as_ref()),
        Commands::Dashboard => Ok(()),
    }
}
