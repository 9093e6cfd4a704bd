//! Bar chart panels built on [`ratatui::widgets::BarChart`].
//!
//! Labels are clipped by display width so wide (e.g. CJK) product names never
//! spill into the neighbouring bar slot.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

const ELLIPSIS: char = '…';

/// Clip `text` to at most `width` terminal columns, ending with `…` when
/// anything was cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

/// One labelled bar.
#[derive(Debug, Clone)]
pub struct BarItem {
    pub label: String,
    pub value: u64,
    pub text: String,
}

/// A labelled cluster of bars (e.g. opening/closing stock for one month).
#[derive(Debug, Clone)]
pub struct BarCluster {
    pub label: String,
    pub values: Vec<(u64, String)>,
}

fn panel<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border)
        .title(Span::styled(format!(" {} ", title), theme.panel_title))
}

/// Render a "no data" message inside a titled panel.
pub fn render_empty_panel(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let body = Paragraph::new(Line::from(Span::styled("No data", theme.dim))).block(panel(title, theme));
    frame.render_widget(body, area);
}

/// Width of each bar given `slots` bars sharing `inner_width` columns.
fn bar_width(inner_width: u16, slots: usize, gap: u16) -> u16 {
    if slots == 0 {
        return 1;
    }
    let slots = slots as u16;
    let total_gap = gap.saturating_mul(slots.saturating_sub(1));
    (inner_width.saturating_sub(total_gap) / slots).clamp(1, 12)
}

/// Vertical bar chart with one bar per item.
pub fn render_bar_chart(frame: &mut Frame, area: Rect, title: &str, items: &[BarItem], theme: &Theme) {
    if items.is_empty() {
        render_empty_panel(frame, area, title, theme);
        return;
    }

    let gap = 1;
    let width = bar_width(area.width.saturating_sub(2), items.len(), gap);

    let bars: Vec<Bar> = items
        .iter()
        .map(|item| {
            Bar::default()
                .value(item.value)
                .label(Line::from(truncate_to_width(&item.label, width as usize)))
                .text_value(truncate_to_width(&item.text, width as usize))
                .style(theme.bar)
                .value_style(theme.bar_value)
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(title, theme))
        .bar_width(width)
        .bar_gap(gap)
        .label_style(theme.label)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Grouped bar chart: one cluster per label, one bar per series in each
/// cluster, coloured by `series_styles`.
pub fn render_grouped_bar_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    clusters: &[BarCluster],
    series_styles: &[Style],
    theme: &Theme,
) {
    if clusters.is_empty() {
        render_empty_panel(frame, area, title, theme);
        return;
    }

    let per_cluster = clusters.iter().map(|c| c.values.len()).max().unwrap_or(1).max(1);
    let group_gap = 2;
    let inner = area
        .width
        .saturating_sub(2)
        .saturating_sub(group_gap * clusters.len().saturating_sub(1) as u16);
    let width = bar_width(inner, clusters.len() * per_cluster, 0);

    let mut chart = BarChart::default()
        .block(panel(title, theme))
        .bar_width(width)
        .bar_gap(0)
        .group_gap(group_gap)
        .label_style(theme.label);

    for cluster in clusters {
        let bars: Vec<Bar> = cluster
            .values
            .iter()
            .enumerate()
            .map(|(i, (value, text))| {
                let style = series_styles.get(i).copied().unwrap_or(theme.bar);
                Bar::default()
                    .value(*value)
                    .text_value(truncate_to_width(text, width as usize))
                    .style(style)
                    .value_style(theme.bar_value)
            })
            .collect();
        let group_width = width as usize * cluster.values.len().max(1);
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(truncate_to_width(&cluster.label, group_width)))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
