//! Main application state and TUI event loop for the inventory dashboard.
//!
//! [`App`] owns the theme, the shared dataset and the aggregates of the page
//! currently on screen.  Switching pages rebuilds only that page's data.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{debug, info};

use dashboard_data::analysis::{build_page, Page, PageData};
use dashboard_data::loader::InventoryDataset;

use crate::components::header::Header;
use crate::overview_view::render_overview;
use crate::table_view::render_no_data;
use crate::themes::Theme;
use crate::trends_view::render_trends;

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub should_quit: bool,
    dataset: Arc<InventoryDataset>,
    page_data: PageData,
}

impl App {
    pub fn new(theme_name: &str, page: Page, dataset: Arc<InventoryDataset>) -> Self {
        let page_data = build_page(&dataset, page);
        Self {
            theme: Theme::from_name(theme_name),
            should_quit: false,
            dataset,
            page_data,
        }
    }

    pub fn page(&self) -> Page {
        self.page_data.page()
    }

    pub fn page_data(&self) -> &PageData {
        &self.page_data
    }

    /// Show `page`, recomputing its aggregates.  Selecting the current page
    /// is a no-op.
    pub fn select_page(&mut self, page: Page) {
        if page == self.page() {
            return;
        }
        debug!("Switching page {} -> {}", self.page().name(), page.name());
        self.page_data = build_page(&self.dataset, page);
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.select_page(self.page().next()),
            KeyCode::BackTab | KeyCode::Left => self.select_page(self.page().prev()),
            KeyCode::Char(c) => {
                if let Some(page) = c.to_digit(10).and_then(|d| Page::from_number(d as usize)) {
                    self.select_page(page);
                }
            }
            _ => {}
        }
    }

    /// Run the dashboard until `q` / `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// responsive while the caller races it against the OS signal.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        info!("Dashboard started on {} page", self.page().name());
        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }

            // Let the runtime poll the Ctrl+C listener between frames.
            tokio::task::yield_now().await;
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("Dashboard closed");

        result
    }

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Header::HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let summary = self.dataset.summary();
        let header = Header::new(self.page(), &summary.source, self.dataset.len(), &self.theme)
            .width(area.width);
        frame.render_widget(Paragraph::new(header.to_lines()), chunks[0]);

        if self.dataset.is_empty() {
            render_no_data(frame, chunks[1], &summary.source, &self.theme);
        } else {
            match &self.page_data {
                PageData::Overview(data) => render_overview(frame, chunks[1], data, &self.theme),
                PageData::Trends(data) => render_trends(frame, chunks[1], data, &self.theme),
            }
        }

        let footer = Line::from(vec![
            Span::styled("Tab/←/→", self.theme.value),
            Span::styled(" switch page  ", self.theme.dim),
            Span::styled("1/2", self.theme.value),
            Span::styled(" jump  ", self.theme.dim),
            Span::styled("q", self.theme.value),
            Span::styled(" quit", self.theme.dim),
        ]);
        frame.render_widget(Paragraph::new(footer), chunks[2]);
    }
}

/// Leave raw mode and the alternate screen.  Used when the event loop is
/// dropped before it could clean up (e.g. on an OS-level Ctrl+C).
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
