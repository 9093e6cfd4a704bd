//! Overview page: headline metrics, stockouts per product and turnover spread
//! per category.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use dashboard_core::formatting::{format_metric, format_number};
use dashboard_data::analysis::OverviewData;

use crate::components::bar_chart::{render_bar_chart, BarItem};
use crate::components::box_plot::render_box_plot;
use crate::components::metric_card::{render_metric_row, MetricCard};
use crate::themes::Theme;

pub fn stockout_bars(data: &OverviewData) -> Vec<BarItem> {
    data.stockout_frequency_by_product
        .iter()
        .map(|p| BarItem {
            label: p.group.label().to_string(),
            value: p.total,
            text: p.total.to_string(),
        })
        .collect()
}

pub fn turnover_groups(data: &OverviewData) -> Vec<(String, Vec<f64>)> {
    data.turnover_distribution_by_category
        .iter()
        .map(|c| (c.group.label().to_string(), c.values.clone()))
        .collect()
}

pub fn render_overview(frame: &mut Frame, area: Rect, data: &OverviewData, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(MetricCard::HEIGHT), Constraint::Min(6)])
        .split(area);

    let metrics = &data.metrics;
    let cards = [
        MetricCard::new(
            "Avg Inventory Turnover",
            format_metric(metrics.avg_inventory_turnover, 2),
            theme,
        ),
        MetricCard::new(
            "Total Stockout Days",
            format_number(metrics.total_stockout_days as f64, 0),
            theme,
        ),
        MetricCard::new("Avg Stock Levels", format_metric(metrics.avg_stock_level, 2), theme),
    ];
    render_metric_row(frame, rows[0], &cards);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_bar_chart(
        frame,
        charts[0],
        "Stockout Frequency by Product",
        &stockout_bars(data),
        theme,
    );
    render_box_plot(
        frame,
        charts[1],
        "Inventory Turnover by Category",
        &turnover_groups(data),
        theme,
    );
}
