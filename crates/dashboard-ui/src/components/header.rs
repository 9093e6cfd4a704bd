use dashboard_data::analysis::Page;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Decorative marker placed either side of the application title.
pub const ACCENT: &str = "▪ ▫ ▪";

/// Dashboard header rendering four lines:
///
/// 1. Application title with accent decorations.
/// 2. A separator sized to the available width.
/// 3. Page tabs with the active page highlighted.
/// 4. Data source and record count in `[ source | N records ]` format.
pub struct Header<'a> {
    pub active: Page,
    pub source: &'a str,
    pub records: usize,
    pub width: u16,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub const HEIGHT: u16 = 4;

    pub fn new(active: Page, source: &'a str, records: usize, theme: &'a Theme) -> Self {
        Self {
            active,
            source,
            records,
            width: 60,
            theme,
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut tabs = Vec::with_capacity(Page::ALL.len() * 2);
        for (i, page) in Page::ALL.iter().enumerate() {
            if i > 0 {
                tabs.push(Span::styled(" ", self.theme.dim));
            }
            let style = if *page == self.active {
                self.theme.tab_active
            } else {
                self.theme.tab_inactive
            };
            tabs.push(Span::styled(format!(" {} {} ", i + 1, page.title()), style));
        }

        let record_label = if self.records == 1 { "record" } else { "records" };

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" INVENTORY PERFORMANCE DASHBOARD ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(
                "─".repeat(self.width as usize),
                self.theme.separator,
            )),
            Line::from(tabs),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(format!("{} {}", self.records, record_label), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_line_count() {
        let theme = Theme::dark();
        let lines = Header::new(Page::Overview, "data.xlsx", 10, &theme).to_lines();
        assert_eq!(lines.len(), Header::HEIGHT as usize);
        assert!(text(&lines[0]).contains("INVENTORY PERFORMANCE DASHBOARD"));
    }

    #[test]
    fn test_header_separator_follows_width() {
        let theme = Theme::dark();
        let lines = Header::new(Page::Overview, "x", 0, &theme).width(42).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 42);
        assert!(sep.chars().all(|c| c == '─'));
    }

    #[test]
    fn test_header_highlights_active_tab() {
        let theme = Theme::dark();
        let lines = Header::new(Page::Trends, "x", 0, &theme).to_lines();
        let tabs = &lines[2];
        let trends = tabs
            .spans
            .iter()
            .find(|s| s.content.contains("Trends"))
            .unwrap();
        let overview = tabs
            .spans
            .iter()
            .find(|s| s.content.contains("Overview"))
            .unwrap();
        assert_eq!(trends.style, theme.tab_active);
        assert_eq!(overview.style, theme.tab_inactive);
        assert!(text(tabs).contains("1 Overview"));
        assert!(text(tabs).contains("2 Trends Over Time"));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::dark();
        let lines = Header::new(Page::Overview, "inventory.xlsx", 1, &theme).to_lines();
        let info = text(&lines[3]);
        assert_eq!(info, "[ inventory.xlsx | 1 record ]");
        assert_eq!(lines[3].spans.len(), 5);
    }
}
