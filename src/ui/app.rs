use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::{error, info};

use super::charts;
use super::components::{
    format_month_point, format_won, render_error, render_info, render_metric_card,
    styled_percentage_change, PRIMARY,
};
use crate::analysis;
use crate::cache::{ContentKey, EnrichmentCache};
use crate::models::{Config, DataSource, EnrichedTable, KPI_TARGET_STEP};

const TAB_TITLES: [&str; 5] = ["Overview", "YoY", "Quarters", "KPI", "Data"];

pub const NO_SOURCE_MESSAGE: &str =
    "Pass --file <CSV> or enable the sample data (press S) to load a dataset.";

/// What the content area currently shows
#[derive(Debug, Clone)]
pub enum LoadState {
    NoSource,
    Loaded {
        source: String,
        key: ContentKey,
        table: Arc<EnrichedTable>,
    },
    Failed {
        message: String,
    },
}

pub struct DashboardApp {
    file: Option<PathBuf>,
    use_sample: bool,
    target: u64,
    cache: EnrichmentCache,
    state: LoadState,
    pub selected_tab: usize,
    pub should_quit: bool,
}

impl DashboardApp {
    pub fn new(file: Option<PathBuf>, use_sample: bool, target: u64, cache_capacity: usize) -> Self {
        Self {
            file,
            use_sample,
            target,
            cache: EnrichmentCache::new(cache_capacity),
            state: LoadState::NoSource,
            selected_tab: 0,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn cache(&self) -> &EnrichmentCache {
        &self.cache
    }

    /// Load the current source through the cache
    pub fn reload(&mut self) {
        let Some(source) = DataSource::select(self.file.clone(), self.use_sample) else {
            self.state = LoadState::NoSource;
            return;
        };

        let loaded = source
            .load_bytes()
            .and_then(|bytes| self.cache.get_or_enrich(&bytes));

        self.state = match loaded {
            Ok((key, table)) => {
                info!("Loaded {} rows from {} ({})", table.len(), source.label(), key);
                LoadState::Loaded {
                    source: source.label(),
                    key,
                    table,
                }
            }
            Err(e) => {
                error!("Failed to load {}: {}", source.label(), e);
                LoadState::Failed {
                    message: e.user_message(),
                }
            }
        };
    }

    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(f.area());

        match &self.state {
            LoadState::Loaded { table, .. } => {
                self.render_tab_bar(f, chunks[0]);
                self.render_content(f, chunks[1], table);
            }
            LoadState::NoSource => render_info(f, chunks[0].union(chunks[1]), NO_SOURCE_MESSAGE),
            LoadState::Failed { message } => render_error(f, chunks[0].union(chunks[1]), message),
        }

        self.render_status_bar(f, chunks[2]);
    }

    fn render_tab_bar(&self, f: &mut Frame, area: Rect) {
        let tabs = ratatui::widgets::Tabs::new(TAB_TITLES.to_vec())
            .block(Block::default().borders(Borders::ALL).title("Monthly Sales Dashboard"))
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .select(self.selected_tab);

        f.render_widget(tabs, area);
    }

    fn render_content(&self, f: &mut Frame, area: Rect, table: &EnrichedTable) {
        match self.selected_tab {
            1 => charts::render_yoy_chart(f, area, table),
            2 => charts::render_quarter_distribution(f, area, table),
            3 => charts::render_kpi_chart(f, area, table, self.target),
            4 => charts::render_data_preview(f, area, table),
            _ => self.render_overview(f, area, table),
        }
    }

    fn render_overview(&self, f: &mut Frame, area: Rect, table: &EnrichedTable) {
        let summary = analysis::summarize(table);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(chunks[0]);

        let bold = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
        render_metric_card(
            f,
            cards[0],
            "Total revenue",
            Line::from(Span::styled(format_won(summary.total_revenue), bold)),
        );
        let mean = match summary.mean_yoy_pct {
            Some(pct) => Line::from(styled_percentage_change(pct)),
            None => Line::from("-"),
        };
        render_metric_card(f, cards[1], "Average YoY change", mean);
        render_metric_card(
            f,
            cards[2],
            "Best month",
            Line::from(Span::styled(format_month_point(summary.best_month.as_ref()), bold)),
        );
        render_metric_card(
            f,
            cards[3],
            "Worst month",
            Line::from(Span::styled(format_month_point(summary.worst_month.as_ref()), bold)),
        );

        charts::render_trend_chart(f, chunks[1], table, &summary);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(Color::Gray);
        let stats = self.cache.stats();
        let source = match &self.state {
            LoadState::Loaded { source, key, .. } => format!("{} [{}]", source, key),
            _ => "-".to_string(),
        };

        let status_text = vec![Line::from(vec![
            Span::styled("Tab", key_style),
            Span::styled(" views • ", text_style),
            Span::styled("+/-", key_style),
            Span::styled(format!(" target {} • ", format_won(self.target as f64)), text_style),
            Span::styled("S", key_style),
            Span::styled(
                format!(" sample {} • ", if self.use_sample { "on" } else { "off" }),
                text_style,
            ),
            Span::styled("R", key_style),
            Span::styled(" reload • ", text_style),
            Span::styled("C", key_style),
            Span::styled(
                format!(" clear cache ({}/{} hits) • ", stats.hits, stats.hits + stats.misses),
                text_style,
            ),
            Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" quit • {}", source), text_style),
        ])];

        let paragraph = Paragraph::new(status_text)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White));

        f.render_widget(paragraph, area);
    }

    pub fn handle_key_event(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.next_tab();
            }
            KeyCode::BackTab => {
                self.previous_tab();
            }
            KeyCode::Char(c @ '1'..='5') => {
                self.select_tab(c as usize - '1' as usize);
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.target = self.target.saturating_add(KPI_TARGET_STEP);
            }
            KeyCode::Char('-') | KeyCode::Down => {
                self.target = self.target.saturating_sub(KPI_TARGET_STEP);
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.use_sample = !self.use_sample;
                self.reload();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reload();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.cache.clear();
                self.reload();
            }
            _ => {}
        }
        Ok(())
    }

    fn next_tab(&mut self) {
        self.selected_tab = (self.selected_tab + 1) % TAB_TITLES.len();
    }

    fn previous_tab(&mut self) {
        self.selected_tab = if self.selected_tab == 0 {
            TAB_TITLES.len() - 1
        } else {
            self.selected_tab - 1
        };
    }

    fn select_tab(&mut self, tab: usize) {
        if tab < TAB_TITLES.len() {
            self.selected_tab = tab;
        }
    }
}

/// Run the interactive dashboard until the user quits
pub fn run_app(config: &Config, file: Option<PathBuf>, use_sample: bool, target: u64) -> Result<()> {
    let mut app = DashboardApp::new(file, use_sample, target, config.cache_capacity);
    app.reload();

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    // Main application loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| app.draw(f)) {
            break Err(e.into());
        }

        if let Ok(Event::Key(key)) = event::read() {
            if key.kind == KeyEventKind::Press {
                if let Err(e) = app.handle_key_event(key.code) {
                    break Err(e);
                }

                if app.should_quit {
                    break Ok(());
                }
            }
        }
    };

    // Cleanup terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}
