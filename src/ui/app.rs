//! Main TUI application state and logic

use crate::parser::parse::{Compilation, ParseError};
use crate::ui::panes::{self, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const PAGE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tree,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Source,
        }
    }

    /// With two panes this is the same as [`FocusedPane::next`].
    pub fn prev(self) -> Self {
        self.next()
    }
}

/// The main application state
pub struct App {
    /// The program text as read from disk
    pub source_code: String,

    /// The compiled tree, or the error that stopped compilation
    pub outcome: Result<Compilation, ParseError>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets, clamped by the panes while rendering
    pub source_scroll: usize,
    pub tree_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(source_code: String, outcome: Result<Compilation, ParseError>) -> Self {
        let status_message = match &outcome {
            Ok(compilation) => match compilation.diagnostics.first() {
                Some(first) => first.to_string(),
                None => String::from("Compiled successfully"),
            },
            Err(error) => error.message(),
        };
        // Open with the failing line in view
        let source_scroll = outcome
            .as_ref()
            .err()
            .and_then(ParseError::line)
            .map(|line| line.saturating_sub(3))
            .unwrap_or(0);

        App {
            source_code,
            outcome,
            focused_pane: FocusedPane::Source,
            source_scroll,
            tree_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        // Source (left) | Tree (right)
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        let error_line = self.outcome.as_ref().err().and_then(ParseError::line);
        panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            error_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_tree_pane(
            frame,
            columns[1],
            self.outcome.as_ref().map(|c| &c.root),
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        let (statements, diagnostics) = match &self.outcome {
            Ok(c) => (c.root.children().len(), c.diagnostics.len()),
            Err(_) => (0, 0),
        };
        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                statements,
                diagnostics,
                failed: self.outcome.is_err(),
            },
        );
    }

    fn scroll_mut(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Tree => &mut self.tree_scroll,
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => {
                let scroll = self.scroll_mut();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.scroll_mut();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                let scroll = self.scroll_mut();
                *scroll = scroll.saturating_sub(PAGE);
            }
            KeyCode::PageDown => {
                let scroll = self.scroll_mut();
                *scroll = scroll.saturating_add(PAGE);
            }
            KeyCode::Home => *self.scroll_mut() = 0,
            // Clamped to the last page on the next render
            KeyCode::End => *self.scroll_mut() = usize::MAX,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_focus_and_scroll() {
        let source = "A -> 1\nB -> 2\n".to_string();
        let mut app = App::new(source.clone(), parse(&source));
        assert_eq!(app.status_message, "Compiled successfully");

        press(&mut app, KeyCode::Down);
        assert_eq!(app.source_scroll, 1);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tree);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.tree_scroll, PAGE);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.tree_scroll, 0);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_error_opens_near_failing_line() {
        let source = "A -> 1\nB -> 2\nC -> 3\nD -> 4\nE -> (5\n".to_string();
        let app = App::new(source.clone(), parse(&source));
        assert!(app.outcome.is_err());
        assert_eq!(app.source_scroll, 2);
        assert!(app.status_message.contains("not all parentheses closed"));
    }

    #[test]
    fn test_render_clamps_scroll() {
        let source = "PROGRAM \"demo\"\nIF A == 1 THEN\nDISP A\nEND\n".to_string();
        let mut app = App::new(source.clone(), parse(&source));
        app.tree_scroll = usize::MAX;
        app.source_scroll = usize::MAX;

        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        // 7 rows above the status bar, 5 inside the borders
        assert_eq!(app.source_scroll, 0);
        let tree_size = app.outcome.as_ref().unwrap().root.size();
        assert_eq!(app.tree_scroll, tree_size - 5);
    }
}
