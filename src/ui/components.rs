//! Shared widgets and formatting for the sales dashboard.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::analysis::{MonthPoint, QuarterStats};

pub const PRIMARY: Color = Color::Rgb(94, 0, 129);
pub const SECONDARY: Color = Color::Rgb(97, 0, 122);
pub const ACCENT: Color = Color::Rgb(179, 134, 195);
pub const POSITIVE: Color = Color::Rgb(179, 134, 195);
pub const NEGATIVE: Color = Color::Rgb(97, 13, 124);

/// Insert thousands separators into a whole number
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format an amount in won, e.g. `234,000,000원`
pub fn format_won(value: f64) -> String {
    format!("{}원", group_thousands(value.round() as i64))
}

/// Format an optional amount, `-` when missing
pub fn format_optional_won(value: Option<f64>) -> String {
    value.map(format_won).unwrap_or_else(|| "-".to_string())
}

/// `2024-08 · 28,000,000원`, or `-` when there is no such month
pub fn format_month_point(point: Option<&MonthPoint>) -> String {
    match point {
        Some(p) => format!("{} · {}", p.period, format_won(p.revenue)),
        None => "-".to_string(),
    }
}

/// Create a percentage change span with + or - prefix
pub fn styled_percentage_change(value: f64) -> Span<'static> {
    let formatted = if value >= 0.0 {
        format!("+{:.1}%", value)
    } else {
        format!("{:.1}%", value)
    };

    if value >= 0.0 {
        Span::styled(formatted, Style::default().fg(POSITIVE))
    } else {
        Span::styled(formatted, Style::default().fg(NEGATIVE).add_modifier(Modifier::BOLD))
    }
}

/// Render a labelled metric card
pub fn render_metric_card(f: &mut Frame, area: Rect, label: &str, value: Line<'static>) {
    let card = Paragraph::new(value)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(Span::styled(
                    label.to_string(),
                    Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(card, area);
}

/// Draw a one-line box plot of `stats` scaled to `[lo, hi]`
///
/// Whiskers span min..max, the box spans q1..q3 and `┃` marks the median.
pub fn box_plot_line(stats: &QuarterStats, lo: f64, hi: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let span = hi - lo;
    let col = |value: f64| -> usize {
        if span <= 0.0 {
            return width / 2;
        }
        let pos = ((value - lo) / span * (width - 1) as f64).round();
        (pos.max(0.0) as usize).min(width - 1)
    };

    let mut cells = vec![' '; width];
    let (min_col, max_col) = (col(stats.min), col(stats.max));
    for cell in cells.iter_mut().take(max_col + 1).skip(min_col) {
        *cell = '─';
    }
    for cell in cells.iter_mut().take(col(stats.q3) + 1).skip(col(stats.q1)) {
        *cell = '█';
    }
    cells[min_col] = '├';
    cells[max_col] = '┤';
    cells[col(stats.median)] = '┃';
    cells.into_iter().collect()
}

/// Render an informational message in place of the dashboard
pub fn render_info(f: &mut Frame, area: Rect, message: &str) {
    let info = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("No data"))
        .style(Style::default().fg(Color::Yellow));

    f.render_widget(info, area);
}

/// Render error message
pub fn render_error(f: &mut Frame, area: Rect, error: &str) {
    let error_paragraph = Paragraph::new(error.to_string())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .style(Style::default().fg(Color::Red));

    f.render_widget(error_paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(234_000_000), "234,000,000");
        assert_eq!(group_thousands(-1_234_567), "-1,234,567");
    }

    #[test]
    fn test_format_won() {
        assert_eq!(format_won(28_000_000.0), "28,000,000원");
        assert_eq!(format_won(1499.6), "1,500원");
        assert_eq!(format_optional_won(None), "-");
    }

    #[test]
    fn test_format_month_point() {
        let point = MonthPoint {
            index: 7,
            period: "2024-08".to_string(),
            revenue: 28_000_000.0,
        };
        assert_eq!(format_month_point(Some(&point)), "2024-08 · 28,000,000원");
        assert_eq!(format_month_point(None), "-");
    }

    #[test]
    fn test_styled_percentage_change() {
        assert_eq!(styled_percentage_change(5.5).content, "+5.5%");
        assert_eq!(styled_percentage_change(-3.2).content, "-3.2%");
        assert_eq!(styled_percentage_change(0.0).content, "+0.0%");
    }

    #[test]
    fn test_box_plot_line() {
        let stats = QuarterStats {
            quarter: 1,
            count: 3,
            min: 0.0,
            q1: 2.0,
            median: 5.0,
            q3: 8.0,
            max: 10.0,
            values: vec![0.0, 5.0, 10.0],
        };
        let line = box_plot_line(&stats, 0.0, 10.0, 11);
        assert_eq!(line, "├─███┃███─┤");
        assert_eq!(line.chars().count(), 11);
    }

    #[test]
    fn test_box_plot_line_degenerate_range() {
        let stats = QuarterStats {
            quarter: 2,
            count: 1,
            min: 5.0,
            q1: 5.0,
            median: 5.0,
            q3: 5.0,
            max: 5.0,
            values: vec![5.0],
        };
        assert_eq!(box_plot_line(&stats, 5.0, 5.0, 5), "  ┃  ");
    }
}
