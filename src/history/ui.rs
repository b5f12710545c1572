//! Interactive terminal UI for browsing practice session history.
//!
//! Shows past sessions as a scrollable list with keyboard navigation.
//! Selecting an entry returns it so the command can print the stored
//! transcription and critique after the terminal is restored.

use crate::history::SessionEntry;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Padding, Paragraph},
};
use std::io::{self, Stdout};
use std::time::Duration;

const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const META_FG: Color = Color::Rgb(100, 100, 100);
const HIGHLIGHT_BG: Color = Color::Rgb(20, 20, 20);
const HELP_FG: Color = Color::Rgb(100, 100, 100);

/// Interactive browser for completed practice sessions.
pub struct HistoryBrowser {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entries: Vec<SessionEntry>,
    list_state: ListState,
}

enum InputAction {
    Exit,
    Select,
    Up,
    Down,
}

impl HistoryBrowser {
    /// Creates a browser over the given entries and enters alternate
    /// screen mode.
    ///
    /// # Errors
    /// - If the terminal cannot be initialized
    pub fn new(entries: Vec<SessionEntry>) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }

        Ok(Self {
            terminal,
            entries,
            list_state,
        })
    }

    /// Runs the browser loop until the user selects an entry or exits.
    ///
    /// Returns the selected session, or `None` when dismissed.
    ///
    /// # Errors
    /// - If rendering or input handling fails
    pub fn run(&mut self) -> Result<Option<SessionEntry>> {
        if self.entries.is_empty() {
            self.cleanup()?;
            return Ok(None);
        }

        tracing::debug!("History browser started with {} entries", self.entries.len());

        loop {
            self.draw()?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    match self.handle_key(key.code) {
                        Some(InputAction::Exit) => break,
                        Some(InputAction::Select) => {
                            let selected = self
                                .list_state
                                .selected()
                                .map(|i| self.entries[i].clone());
                            self.cleanup()?;
                            return Ok(selected);
                        }
                        Some(InputAction::Up) => self.move_selection(-1),
                        Some(InputAction::Down) => self.move_selection(1),
                        None => {}
                    }
                }
            }
        }

        self.cleanup()?;
        Ok(None)
    }

    fn handle_key(&self, code: KeyCode) -> Option<InputAction> {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => Some(InputAction::Exit),
            KeyCode::Enter => Some(InputAction::Select),
            KeyCode::Up | KeyCode::Char('k') => Some(InputAction::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(InputAction::Down),
            _ => None,
        }
    }

    fn move_selection(&mut self, delta: i64) {
        let len = self.entries.len() as i64;
        let current = self.list_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len - 1);
        self.list_state.select(Some(next as usize));
    }

    fn draw(&mut self) -> Result<()> {
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let line = Line::from(vec![
                    Span::styled(
                        entry.created_at.format("%Y-%m-%d %H:%M ").to_string(),
                        Style::default().fg(META_FG),
                    ),
                    Span::styled(
                        format!("{:.1} ", entry.overall_rating),
                        Style::default().fg(FG).bold(),
                    ),
                    Span::styled(
                        format!("[{}] ", entry.category),
                        Style::default().fg(META_FG),
                    ),
                    Span::styled(entry.question.clone(), Style::default().fg(FG)),
                ]);
                ListItem::new(line)
            })
            .collect();

        let list_state = &mut self.list_state;

        self.terminal.draw(|frame| {
            let area = frame.area();

            let [list_area, help_area] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::NONE)
                        .padding(Padding::uniform(1))
                        .style(Style::default().bg(BG)),
                )
                .highlight_style(Style::default().bg(HIGHLIGHT_BG))
                .highlight_spacing(HighlightSpacing::Always);

            frame.render_stateful_widget(list, list_area, list_state);

            let help = Paragraph::new("↑/↓ navigate · Enter view · Esc quit")
                .style(Style::default().fg(HELP_FG).bg(BG));
            frame.render_widget(help, help_area);
        })?;

        Ok(())
    }

    /// Cleans up terminal state and exits alternate screen mode.
    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for HistoryBrowser {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
