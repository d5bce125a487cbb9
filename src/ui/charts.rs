//! The four dashboard charts and the data preview.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use super::components::{
    box_plot_line, format_optional_won, format_won, ACCENT, NEGATIVE, POSITIVE, PRIMARY,
    SECONDARY,
};
use crate::analysis::{self, SalesSummary};
use crate::models::EnrichedTable;

fn chart_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ))
}

/// Bounds padded by 5% so lines don't sit on the frame
fn padded_bounds(values: impl Iterator<Item = f64>, include_zero: bool) -> [f64; 2] {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    [lo - pad, hi + pad]
}

/// First, middle and last period labels along the x axis
fn period_labels(table: &EnrichedTable) -> Vec<Span<'static>> {
    let records = table.records();
    match records.len() {
        0 => vec![],
        1 => vec![Span::raw(records[0].period.clone())],
        n => vec![
            Span::raw(records[0].period.clone()),
            Span::raw(records[n / 2].period.clone()),
            Span::raw(records[n - 1].period.clone()),
        ],
    }
}

fn x_bounds(table: &EnrichedTable) -> [f64; 2] {
    [0.0, (table.len().max(2) - 1) as f64]
}

fn amount_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    vec![
        Span::raw(format_won(bounds[0])),
        Span::raw(format_won((bounds[0] + bounds[1]) / 2.0)),
        Span::raw(format_won(bounds[1])),
    ]
}

fn pct_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    vec![
        Span::raw(format!("{:.0}%", bounds[0])),
        Span::raw(format!("{:.0}%", (bounds[0] + bounds[1]) / 2.0)),
        Span::raw(format!("{:.0}%", bounds[1])),
    ]
}

/// 1) Revenue vs prior-year revenue with best/worst markers
pub fn render_trend_chart(f: &mut Frame, area: Rect, table: &EnrichedTable, summary: &SalesSummary) {
    let records = table.records();
    let revenue: Vec<(f64, f64)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.revenue.map(|v| (i as f64, v)))
        .collect();
    let prior: Vec<(f64, f64)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.prior_year_revenue.map(|v| (i as f64, v)))
        .collect();
    let best: Vec<(f64, f64)> = summary
        .best_month
        .iter()
        .map(|p| (p.index as f64, p.revenue))
        .collect();
    let worst: Vec<(f64, f64)> = summary
        .worst_month
        .iter()
        .map(|p| (p.index as f64, p.revenue))
        .collect();

    let y_bounds = padded_bounds(revenue.iter().chain(prior.iter()).map(|(_, y)| *y), false);

    let datasets = vec![
        Dataset::default()
            .name("Revenue")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(PRIMARY))
            .data(&revenue),
        Dataset::default()
            .name("Prior year")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ACCENT))
            .data(&prior),
        Dataset::default()
            .name("Best")
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&best),
        Dataset::default()
            .name("Worst")
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(NEGATIVE))
            .data(&worst),
    ];

    let chart = Chart::new(datasets)
        .block(chart_block("1) Monthly revenue trend (revenue vs prior year)"))
        .x_axis(
            Axis::default()
                .title("Month")
                .bounds(x_bounds(table))
                .labels(period_labels(table)),
        )
        .y_axis(
            Axis::default()
                .title("Revenue")
                .bounds(y_bounds)
                .labels(amount_labels(y_bounds)),
        );

    f.render_widget(chart, area);
}

/// 2) Year-over-year change bars around a zero line
pub fn render_yoy_chart(f: &mut Frame, area: Rect, table: &EnrichedTable) {
    let series = analysis::yoy_series(table);
    let positive: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter(|(_, (_, pct))| *pct >= 0.0)
        .map(|(i, (_, pct))| (i as f64, *pct))
        .collect();
    let negative: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter(|(_, (_, pct))| *pct < 0.0)
        .map(|(i, (_, pct))| (i as f64, *pct))
        .collect();
    let bounds = x_bounds(table);
    let zero_line = vec![(bounds[0], 0.0), (bounds[1], 0.0)];
    let y_bounds = padded_bounds(series.iter().map(|(_, pct)| *pct), true);

    let datasets = vec![
        Dataset::default()
            .name("0% baseline")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(PRIMARY))
            .data(&zero_line),
        Dataset::default()
            .name("Increase")
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(POSITIVE))
            .data(&positive),
        Dataset::default()
            .name("Decrease")
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(NEGATIVE))
            .data(&negative),
    ];

    let chart = Chart::new(datasets)
        .block(chart_block("2) Year-over-year change"))
        .x_axis(
            Axis::default()
                .title("Month")
                .bounds(bounds)
                .labels(period_labels(table)),
        )
        .y_axis(
            Axis::default()
                .title("Change (%)")
                .bounds(y_bounds)
                .labels(pct_labels(y_bounds)),
        );

    f.render_widget(chart, area);
}

/// 3) Revenue distribution per quarter
pub fn render_quarter_distribution(f: &mut Frame, area: Rect, table: &EnrichedTable) {
    let stats = analysis::quarterly_distribution(table);
    let block = chart_block("3) Revenue distribution by quarter (box plot)");

    if stats.is_empty() {
        f.render_widget(
            Paragraph::new("No rows with both a valid month and revenue").block(block),
            area,
        );
        return;
    }

    let lo = stats.iter().map(|s| s.min).fold(f64::INFINITY, f64::min);
    let hi = stats.iter().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(stats.len() as u16 * 2 + 1), Constraint::Min(0)])
        .split(inner);

    let plot_width = chunks[0].width.saturating_sub(6) as usize;
    let mut lines = Vec::new();
    for s in &stats {
        lines.push(Line::from(vec![
            Span::styled(format!("Q{}  ", s.quarter), Style::default().fg(SECONDARY)),
            Span::styled(box_plot_line(s, lo, hi, plot_width), Style::default().fg(ACCENT)),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::raw(format!("{} … {}", format_won(lo), format_won(hi))),
    ]));
    f.render_widget(Paragraph::new(lines), chunks[0]);

    let header = Row::new(vec!["Quarter", "Count", "Min", "Q1", "Median", "Q3", "Max"])
        .style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = stats
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(format!("Q{}", s.quarter)),
                Cell::from(s.count.to_string()),
                Cell::from(format_won(s.min)),
                Cell::from(format_won(s.q1)),
                Cell::from(format_won(s.median)),
                Cell::from(format_won(s.q3)),
                Cell::from(format_won(s.max)),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
    ];
    f.render_widget(Table::new(rows, widths).header(header), chunks[1]);
}

/// 4) KPI achievement rate against the 100% target line
pub fn render_kpi_chart(f: &mut Frame, area: Rect, table: &EnrichedTable, target: u64) {
    let points = analysis::kpi_achievement(table, target);
    let rates: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.rate_pct.map(|r| (i as f64, r)))
        .collect();
    let bounds = x_bounds(table);
    let target_line = vec![(bounds[0], 100.0), (bounds[1], 100.0)];
    let y_bounds = padded_bounds(rates.iter().map(|(_, r)| *r).chain([100.0]), true);

    let datasets = vec![
        Dataset::default()
            .name("Target 100%")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(NEGATIVE))
            .data(&target_line),
        Dataset::default()
            .name("Achievement")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(PRIMARY))
            .data(&rates),
    ];

    let title = format!(
        "4) Monthly KPI achievement (target {})",
        format_won(target as f64)
    );
    let chart = Chart::new(datasets)
        .block(chart_block(&title))
        .x_axis(
            Axis::default()
                .title("Month")
                .bounds(bounds)
                .labels(period_labels(table)),
        )
        .y_axis(
            Axis::default()
                .title("Achievement (%)")
                .bounds(y_bounds)
                .labels(pct_labels(y_bounds)),
        );

    f.render_widget(chart, area);
}

/// Enriched table preview
pub fn render_data_preview(f: &mut Frame, area: Rect, table: &EnrichedTable) {
    let header = Row::new(vec!["월", "매출액", "전년동월", "증감률", "분기"])
        .style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = table
        .records()
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.period.clone()),
                Cell::from(format_optional_won(r.revenue)),
                Cell::from(format_optional_won(r.prior_year_revenue)),
                Cell::from(format!("{:.1}%", r.yoy_change_pct)),
                Cell::from(r.quarter.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(6),
    ];
    let table_widget = Table::new(rows, widths)
        .header(header)
        .block(chart_block("Data preview"));
    f.render_widget(table_widget, area);
}
