use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::themes::Theme;

/// A bordered panel showing one labelled scalar.
pub struct MetricCard<'a> {
    pub title: &'a str,
    pub value: String,
    pub theme: &'a Theme,
}

impl<'a> MetricCard<'a> {
    pub const HEIGHT: u16 = 4;

    pub fn new(title: &'a str, value: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            title,
            value: value.into(),
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.panel_border)
            .title(Span::styled(format!(" {} ", self.title), self.theme.panel_title));

        let body = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(self.value.clone(), self.theme.metric_value)),
        ])
        .alignment(Alignment::Center)
        .block(block);

        frame.render_widget(body, area);
    }
}

/// Lay out `cards` side by side in equal-width columns.
pub fn render_metric_row(frame: &mut Frame, area: Rect, cards: &[MetricCard]) {
    if cards.is_empty() {
        return;
    }
    let n = cards.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, n)))
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        card.render(frame, *column);
    }
}
