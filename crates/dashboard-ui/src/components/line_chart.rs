use dashboard_core::formatting::format_compact;
use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition},
    Frame,
};

use crate::components::bar_chart::render_empty_panel;
use crate::themes::Theme;

/// One named line. Points are `(x index, y value)`.
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub name: String,
    pub style: Style,
    pub points: Vec<(f64, f64)>,
}

impl LineSeries {
    /// Build a series from y values placed at x = 0, 1, 2, ...
    pub fn from_values(name: impl Into<String>, style: Style, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.into(),
            style,
            points: values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i as f64, v))
                .collect(),
        }
    }
}

/// Y-axis upper bound with a little headroom; never zero.
pub fn y_upper_bound(series: &[LineSeries]) -> f64 {
    let max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Pick at most `max_labels` evenly spaced labels, always keeping the first
/// and last.
pub fn sample_labels(labels: &[String], max_labels: usize) -> Vec<String> {
    if labels.len() <= max_labels || max_labels < 2 {
        return labels.iter().take(max_labels.max(1)).cloned().collect();
    }
    let last = labels.len() - 1;
    (0..max_labels)
        .map(|i| labels[i * last / (max_labels - 1)].clone())
        .collect()
}

/// Render `series` against shared x labels (one per index).
pub fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    x_labels: &[String],
    series: &[LineSeries],
    theme: &Theme,
) {
    if series.iter().all(|s| s.points.is_empty()) {
        render_empty_panel(frame, area, title, theme);
        return;
    }

    let x_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(x, _)| *x))
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let y_max = y_upper_bound(series);

    // Roughly one label per 12 columns.
    let max_labels = (area.width as usize / 12).max(2);
    let x_axis_labels: Vec<Span> = sample_labels(x_labels, max_labels)
        .into_iter()
        .map(|l| Span::styled(l, theme.axis))
        .collect();
    let y_axis_labels: Vec<Span> = [0.0, y_max / 2.0, y_max]
        .iter()
        .map(|v| Span::styled(format_compact(*v), theme.axis))
        .collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(s.style)
                .data(&s.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border)
                .title(Span::styled(format!(" {} ", title), theme.panel_title)),
        )
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(x_axis_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, y_max])
                .labels(y_axis_labels),
        )
        .legend_position(Some(LegendPosition::TopRight));

    frame.render_widget(chart, area);
}
