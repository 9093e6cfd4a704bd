//! Trends page: stock movement over time.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use dashboard_core::formatting::format_compact;
use dashboard_data::analysis::TrendsData;

use crate::components::bar_chart::{render_grouped_bar_chart, BarCluster};
use crate::components::line_chart::{render_line_chart, LineSeries};
use crate::table_view::{month_rows, render_table_view};
use crate::themes::Theme;

fn stock_level_series(data: &TrendsData, theme: &Theme) -> (Vec<String>, Vec<LineSeries>) {
    let labels = data
        .stock_levels_over_time
        .iter()
        .map(|l| l.key.format("%Y-%m-%d").to_string())
        .collect();
    let series = vec![
        LineSeries::from_values(
            "Opening",
            theme.opening_stock,
            data.stock_levels_over_time.iter().map(|l| l.mean_opening),
        ),
        LineSeries::from_values(
            "Closing",
            theme.closing_stock,
            data.stock_levels_over_time.iter().map(|l| l.mean_closing),
        ),
    ];
    (labels, series)
}

fn stock_used_series(data: &TrendsData, theme: &Theme) -> (Vec<String>, Vec<LineSeries>) {
    let labels = data
        .stock_used_by_product_over_time
        .first()
        .map(|s| s.points.iter().map(|(m, _)| m.to_string()).collect())
        .unwrap_or_default();
    let series = data
        .stock_used_by_product_over_time
        .iter()
        .enumerate()
        .map(|(i, s)| {
            LineSeries::from_values(
                s.group.label(),
                theme.series_style(i),
                s.points.iter().map(|(_, v)| *v),
            )
        })
        .collect();
    (labels, series)
}

/// Opening/closing clusters per month for the grouped bar chart.
pub fn month_clusters(data: &TrendsData) -> Vec<BarCluster> {
    data.stock_levels_by_month
        .iter()
        .map(|l| BarCluster {
            label: l.key.to_string(),
            values: vec![
                (l.mean_opening.round().max(0.0) as u64, format_compact(l.mean_opening)),
                (l.mean_closing.round().max(0.0) as u64, format_compact(l.mean_closing)),
            ],
        })
        .collect()
}

pub fn render_trends(frame: &mut Frame, area: Rect, data: &TrendsData, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
    let halves = |r: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(r)
    };

    let top = halves(rows[0]);
    let (labels, series) = stock_level_series(data, theme);
    render_line_chart(frame, top[0], "Stock Levels Over Time", &labels, &series, theme);
    let (labels, series) = stock_used_series(data, theme);
    render_line_chart(frame, top[1], "Stock Used by Product", &labels, &series, theme);

    let middle = halves(rows[1]);
    let months: Vec<String> = data
        .stockout_days_over_time
        .iter()
        .map(|m| m.month.to_string())
        .collect();
    let stockouts = [LineSeries::from_values(
        "Stockout days",
        theme.warning,
        data.stockout_days_over_time.iter().map(|m| m.total as f64),
    )];
    render_line_chart(frame, middle[0], "Stockout Days per Month", &months, &stockouts, theme);

    let received_months: Vec<String> = data
        .stock_received_over_time
        .iter()
        .map(|m| m.month.to_string())
        .collect();
    let received = [LineSeries::from_values(
        "Received",
        theme.opening_stock,
        data.stock_received_over_time.iter().map(|m| m.total),
    )];
    render_line_chart(
        frame,
        middle[1],
        "Stock Received per Month",
        &received_months,
        &received,
        theme,
    );

    let bottom = halves(rows[2]);
    render_table_view(
        frame,
        bottom[0],
        "Stock Levels by Month",
        &month_rows(&data.stock_levels_by_month),
        theme,
    );
    render_grouped_bar_chart(
        frame,
        bottom[1],
        "Opening vs Closing by Month",
        &month_clusters(data),
        &[theme.opening_stock, theme.closing_stock],
        theme,
    );
}
