//! Monthly stock level table for the trends page.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per month plus
//! a highlighted average row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::formatting;
use dashboard_core::models::YearMonth;
use dashboard_data::aggregator::StockLevels;

use crate::themes::Theme;

/// Data for a single row in the monthly table.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRow {
    pub month: String,
    pub mean_opening: f64,
    pub mean_closing: f64,
}

impl MonthRow {
    /// Closing minus opening.
    pub fn change(&self) -> f64 {
        self.mean_closing - self.mean_opening
    }
}

/// Unweighted averages across all rows in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotals {
    pub mean_opening: f64,
    pub mean_closing: f64,
    pub months: usize,
}

pub fn month_rows(levels: &[StockLevels<YearMonth>]) -> Vec<MonthRow> {
    levels
        .iter()
        .map(|l| MonthRow {
            month: l.key.to_string(),
            mean_opening: l.mean_opening,
            mean_closing: l.mean_closing,
        })
        .collect()
}

/// Averages of the row values; `None` for an empty table.
pub fn month_totals(rows: &[MonthRow]) -> Option<MonthTotals> {
    if rows.is_empty() {
        return None;
    }
    let n = rows.len() as f64;
    Some(MonthTotals {
        mean_opening: rows.iter().map(|r| r.mean_opening).sum::<f64>() / n,
        mean_closing: rows.iter().map(|r| r.mean_closing).sum::<f64>() / n,
        months: rows.len(),
    })
}

fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", formatting::format_number(value, 2))
    } else {
        formatting::format_number(value, 2)
    }
}

/// Render the monthly table into `area`.
pub fn render_table_view(frame: &mut Frame, area: Rect, title: &str, rows: &[MonthRow], theme: &Theme) {
    let header_cells = ["Month", "Avg Opening", "Avg Closing", "Change"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let mut all_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(row.month.clone()),
                Cell::from(formatting::format_number(row.mean_opening, 2)),
                Cell::from(formatting::format_number(row.mean_closing, 2)),
                Cell::from(signed(row.change())),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    if let Some(totals) = month_totals(rows) {
        all_rows.push(
            Row::new(vec![
                Cell::from(format!("AVG ({})", totals.months)),
                Cell::from(formatting::format_number(totals.mean_opening, 2)),
                Cell::from(formatting::format_number(totals.mean_closing, 2)),
                Cell::from(signed(totals.mean_closing - totals.mean_opening)),
            ])
            .style(theme.table_total),
        );
    }

    let widths = [
        Constraint::Length(10),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(12),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border)
                .title(Span::styled(format!(" {} ", title), theme.panel_title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no data" placeholder for a dataset without records.
pub fn render_no_data(frame: &mut Frame, area: Rect, source: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No inventory records found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(format!("Source: {}", source), theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Inventory Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
