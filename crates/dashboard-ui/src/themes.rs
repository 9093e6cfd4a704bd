use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Unknown` is returned.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .map(parse_colorfgbg)
        .unwrap_or(BackgroundType::Unknown)
}

fn parse_colorfgbg(value: &str) -> BackgroundType {
    match value.split(';').next_back().and_then(|bg| bg.trim().parse::<u8>().ok()) {
        Some(bg) if bg <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Unknown,
    }
}

/// Complete theme definition carrying all styles used by the dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,
    pub error: Style,

    // ── Panels ───────────────────────────────────────────────────────────────
    pub panel_border: Style,
    pub panel_title: Style,
    pub metric_value: Style,
    pub axis: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub bar: Style,
    pub bar_value: Style,
    pub opening_stock: Style,
    pub closing_stock: Style,
    pub box_body: Style,
    pub box_median: Style,
    pub box_whisker: Style,
    /// Colours cycled through for per-product series.
    pub palette: Vec<Color>,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            panel_border: Style::default().fg(Color::DarkGray),
            panel_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            metric_value: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::Gray),

            bar: Style::default().fg(Color::Cyan),
            bar_value: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),
            opening_stock: Style::default().fg(Color::Cyan),
            closing_stock: Style::default().fg(Color::Magenta),
            box_body: Style::default().fg(Color::Cyan),
            box_median: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            box_whisker: Style::default().fg(Color::Gray),
            palette: vec![
                Color::Cyan,
                Color::Magenta,
                Color::Green,
                Color::Yellow,
                Color::Blue,
                Color::Red,
            ],

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so that content remains legible against a
    /// white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Magenta),
            error: Style::default().fg(Color::Red),

            panel_border: Style::default().fg(Color::Gray),
            panel_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            metric_value: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::DarkGray),

            bar: Style::default().fg(Color::Blue),
            bar_value: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),
            opening_stock: Style::default().fg(Color::Blue),
            closing_stock: Style::default().fg(Color::Magenta),
            box_body: Style::default().fg(Color::Blue),
            box_median: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            box_whisker: Style::default().fg(Color::DarkGray),
            palette: vec![
                Color::Blue,
                Color::Magenta,
                Color::Green,
                Color::Red,
                Color::Cyan,
                Color::DarkGray,
            ],

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// Avoids bold modifiers to maximise compatibility with minimal terminal
    /// emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default().fg(Color::Black).bg(Color::White),
            tab_inactive: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            panel_border: Style::default().fg(Color::White),
            panel_title: Style::default().fg(Color::Cyan),
            metric_value: Style::default().fg(Color::Yellow),
            axis: Style::default().fg(Color::White),

            bar: Style::default().fg(Color::Green),
            bar_value: Style::default().fg(Color::Black).bg(Color::Green),
            opening_stock: Style::default().fg(Color::Green),
            closing_stock: Style::default().fg(Color::Yellow),
            box_body: Style::default().fg(Color::Green),
            box_median: Style::default().fg(Color::Yellow),
            box_whisker: Style::default().fg(Color::White),
            palette: vec![
                Color::Green,
                Color::Yellow,
                Color::Cyan,
                Color::Magenta,
                Color::Red,
                Color::Blue,
            ],

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names (including `"auto"`).
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour for the `index`-th series, cycling through the palette.
    pub fn series_color(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::Reset;
        }
        self.palette[index % self.palette.len()]
    }

    pub fn series_style(&self, index: usize) -> Style {
        Style::default().fg(self.series_color(index))
    }

    /// Row style alternating between `table_row` and `table_row_alt`.
    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.table_row
        } else {
            self.table_row_alt
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.tab_active.bg, Some(Color::Cyan));
        assert_eq!(t.opening_stock.fg, Some(Color::Cyan));
        assert_eq!(t.closing_stock.fg, Some(Color::Magenta));
        assert_eq!(t.error.fg, Some(Color::Red));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert!(!t.metric_value.add_modifier.contains(Modifier::BOLD));
        assert!(!t.table_total.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("LIGHT").header.fg, Some(Color::Blue));
        assert!(!Theme::from_name("classic")
            .header
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    #[test]
    fn test_parse_colorfgbg() {
        assert_eq!(parse_colorfgbg("15;0"), BackgroundType::Dark);
        assert_eq!(parse_colorfgbg("0;15"), BackgroundType::Light);
        assert_eq!(parse_colorfgbg("0;default;7"), BackgroundType::Light);
        assert_eq!(parse_colorfgbg("garbage"), BackgroundType::Unknown);
    }

    #[test]
    fn test_series_color_cycles() {
        let t = Theme::dark();
        let n = t.palette.len();
        assert_eq!(t.series_color(0), t.series_color(n));
        assert_ne!(t.series_color(0), t.series_color(1));
        assert_eq!(t.series_style(2).fg, Some(t.series_color(2)));
    }

    #[test]
    fn test_row_style_alternates() {
        let t = Theme::dark();
        assert_eq!(t.row_style(0), t.table_row);
        assert_eq!(t.row_style(1), t.table_row_alt);
        assert_eq!(t.row_style(2), t.table_row);
    }
}
