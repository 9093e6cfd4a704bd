//! Horizontal box plots drawn with box-drawing characters, one row per group.

use dashboard_core::formatting::format_number;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::components::bar_chart::{render_empty_panel, truncate_to_width};
use crate::themes::Theme;

const LABEL_WIDTH: usize = 12;
const STATS_WIDTH: usize = 12;

/// Five-number summary of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxSummary {
    /// Summarise `values`; `None` when there are no finite values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Quantile of an ascending, non-empty slice with linear interpolation
/// between the two nearest ranks.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Draw `summary` as a `width`-column strip scaled to `[lo, hi]`.
pub fn box_line<'a>(summary: &BoxSummary, lo: f64, hi: f64, width: usize, theme: &Theme) -> Line<'a> {
    if width == 0 {
        return Line::default();
    }
    let span = hi - lo;
    let col = |v: f64| -> usize {
        if span <= 0.0 {
            width / 2
        } else {
            (((v - lo) / span) * (width - 1) as f64).round().clamp(0.0, (width - 1) as f64) as usize
        }
    };

    let (c_min, c_q1, c_med, c_q3, c_max) = (
        col(summary.min),
        col(summary.q1),
        col(summary.median),
        col(summary.q3),
        col(summary.max),
    );

    let mut cells: Vec<(char, Style)> = vec![(' ', theme.dim); width];
    for cell in cells.iter_mut().take(c_q1).skip(c_min) {
        *cell = ('─', theme.box_whisker);
    }
    for cell in cells.iter_mut().take(c_max + 1).skip(c_q3) {
        *cell = ('─', theme.box_whisker);
    }
    for cell in cells.iter_mut().take(c_q3 + 1).skip(c_q1) {
        *cell = ('█', theme.box_body);
    }
    cells[c_min] = ('├', theme.box_whisker);
    cells[c_max] = ('┤', theme.box_whisker);
    cells[c_med] = ('┃', theme.box_median);

    // Collapse runs of equal style into spans.
    let mut spans: Vec<Span<'a>> = Vec::new();
    let mut run = String::new();
    let mut run_style = cells[0].1;
    for (ch, style) in cells {
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

fn pad_to_width(text: &str, width: usize) -> String {
    let clipped = truncate_to_width(text, width);
    let pad = width.saturating_sub(UnicodeWidthStr::width(clipped.as_str()));
    format!("{}{}", clipped, " ".repeat(pad))
}

/// Render one box plot row per `(label, values)` group on a shared scale.
pub fn render_box_plot(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    groups: &[(String, Vec<f64>)],
    theme: &Theme,
) {
    let summaries: Vec<(&str, BoxSummary)> = groups
        .iter()
        .filter_map(|(label, values)| BoxSummary::from_values(values).map(|s| (label.as_str(), s)))
        .collect();

    if summaries.is_empty() {
        render_empty_panel(frame, area, title, theme);
        return;
    }

    let lo = summaries.iter().map(|(_, s)| s.min).fold(f64::INFINITY, f64::min);
    let hi = summaries.iter().map(|(_, s)| s.max).fold(f64::NEG_INFINITY, f64::max);

    let inner_width = area.width.saturating_sub(2) as usize;
    let plot_width = inner_width.saturating_sub(LABEL_WIDTH + STATS_WIDTH + 2).max(1);

    let mut lines: Vec<Line> = Vec::with_capacity(summaries.len() + 2);
    for (label, summary) in &summaries {
        let mut spans = vec![Span::styled(pad_to_width(label, LABEL_WIDTH), theme.label), Span::raw(" ")];
        spans.extend(box_line(summary, lo, hi, plot_width, theme).spans);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            pad_to_width(&format!("med {}", format_number(summary.median, 2)), STATS_WIDTH),
            theme.value,
        ));
        lines.push(Line::from(spans));
    }

    // Scale line: low bound on the left, high bound on the right.
    let lo_label = format_number(lo, 2);
    let hi_label = format_number(hi, 2);
    let gap = plot_width.saturating_sub(lo_label.len() + hi_label.len());
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH + 1)),
        Span::styled(lo_label, theme.axis),
        Span::raw(" ".repeat(gap)),
        Span::styled(hi_label, theme.axis),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border)
        .title(Span::styled(format!(" {} ", title), theme.panel_title));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
