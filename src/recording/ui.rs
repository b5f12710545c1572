//! Terminal UI for answer recording.
//!
//! Shows the question being answered, a scrolling volume sparkline, and a
//! footer with recording duration and level meters while the microphone is
//! live.

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Paragraph, Sparkline, Wrap},
};
use std::error::Error;
use std::io::{stdout, Stdout};

const WAVE_FG: Color = Color::Rgb(206, 224, 220);
const BG: Color = Color::Rgb(0, 0, 0);
const ACCENT: Color = Color::Rgb(185, 207, 212);
const PROMPT_FG: Color = Color::Rgb(255, 255, 255);

/// User input command during recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    /// Continue recording (no key pressed)
    Continue,
    /// Stop and keep the take (Enter key)
    Stop,
    /// Discard the take and leave the recording screen (Escape or 'q')
    Cancel,
}

/// Full-screen recording view with live volume history.
pub struct RecorderTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    question: String,
    volume_history: Vec<u64>,
    last_sample_time: std::time::Instant,
    sample_interval: std::time::Duration,
    last_peak: u8,
    terminal_width: usize,
    sample_rate: u32,
    recording_start_time: std::time::Instant,
    peak_hold: u8,
    peak_hold_time: std::time::Instant,
    peak_volume_threshold: u8,
    reference_level_db: i8,
}

impl RecorderTui {
    /// Creates the recording view and enters alternate screen mode.
    ///
    /// # Errors
    /// - If the terminal cannot be initialized
    /// - If raw mode or the alternate screen cannot be entered
    pub fn new(
        question: &str,
        sample_rate: u32,
        peak_volume_threshold: u8,
        reference_level_db: i8,
    ) -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let size = terminal.size()?;
        let terminal_width = size.width as usize;

        let now = std::time::Instant::now();
        Ok(RecorderTui {
            terminal,
            question: question.to_string(),
            volume_history: vec![0u64; terminal_width],
            last_sample_time: now,
            sample_interval: std::time::Duration::from_millis(50),
            last_peak: 0,
            terminal_width,
            sample_rate,
            recording_start_time: now,
            peak_hold: 0,
            peak_hold_time: now,
            peak_volume_threshold,
            reference_level_db,
        })
    }

    /// Renders the question, volume history and status footer.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render(&mut self, samples: &[i16]) -> Result<(), Box<dyn Error>> {
        let current_volume = self.calculate_volume(samples);

        if self.last_sample_time.elapsed() >= self.sample_interval {
            self.volume_history.push(current_volume as u64);
            if self.volume_history.len() > self.terminal_width {
                self.volume_history.remove(0);
            }
            self.last_sample_time = std::time::Instant::now();
        }

        let size = self.terminal.size()?;
        let current_width = size.width as usize;
        if current_width != self.terminal_width {
            self.terminal_width = current_width;
            while self.volume_history.len() > self.terminal_width {
                self.volume_history.remove(0);
            }
            while self.volume_history.len() < self.terminal_width {
                self.volume_history.insert(0, 0);
            }
        }

        let peak_hold = self.peak_hold;
        let last_peak = self.last_peak;
        let peak_volume_threshold = self.peak_volume_threshold;
        let duration = self.recording_start_time.elapsed();
        let question = self.question.clone();

        self.terminal.draw(|frame| {
            let area = frame.area();

            let [prompt_area, wave_area, footer_area] = Layout::vertical([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .areas(area);

            let prompt = Paragraph::new(question.as_str())
                .style(Style::default().fg(PROMPT_FG).bg(BG))
                .wrap(Wrap { trim: true });
            frame.render_widget(prompt, prompt_area);

            let sparkline = Sparkline::default()
                .data(&self.volume_history)
                .max(100)
                .style(Style::default().bg(BG).fg(WAVE_FG));
            frame.render_widget(sparkline, wave_area);

            let peak_style = if peak_hold >= peak_volume_threshold {
                Style::default().bg(Color::Red).fg(Color::Rgb(255, 255, 255))
            } else {
                Style::default()
            };

            let duration_secs = duration.as_secs();
            let footer = ratatui::text::Line::from(vec![
                ratatui::text::Span::styled("● ", Style::default().fg(Color::Red)),
                ratatui::text::Span::raw(format!(
                    "{}:{:02}",
                    duration_secs / 60,
                    duration_secs % 60
                )),
                ratatui::text::Span::raw(" / "),
                ratatui::text::Span::raw(format!("{last_peak}%")),
                ratatui::text::Span::raw(" / "),
                ratatui::text::Span::styled(format!("{peak_hold}%"), peak_style),
                ratatui::text::Span::raw("   Enter: stop · Esc: cancel"),
            ]);

            let footer = Paragraph::new(footer).style(Style::default().fg(ACCENT).bg(BG));
            frame.render_widget(footer, footer_area);
        })?;

        Ok(())
    }

    /// Calculates current volume in percent and updates peak hold tracking.
    ///
    /// Converts the RMS of the most recent samples to dBFS and normalizes
    /// to 0-100% against the configured reference level. Peak hold keeps
    /// the loudest level of the last 3 seconds.
    fn calculate_volume(&mut self, samples: &[i16]) -> u8 {
        if samples.is_empty() {
            return 0;
        }

        let last_samples_count =
            std::cmp::min(self.sample_rate / 20, samples.len() as u32) as usize;
        let recent_samples = &samples[samples.len() - last_samples_count..];

        let sum_of_squares: i64 = recent_samples.iter().map(|&x| (x as i64).pow(2)).sum();
        let mean_square = sum_of_squares / recent_samples.len() as i64;
        let rms = (mean_square as f32).sqrt();

        let db_fs = if rms > 0.0 {
            20.0 * (rms / 32767.0).log10()
        } else {
            -160.0
        };

        let min_db = self.reference_level_db as f32 - 40.0;
        let normalized = ((db_fs - min_db) / 40.0 * 100.0).clamp(4.0, 100.0) as u8;

        self.last_peak = normalized;

        if normalized > self.peak_hold || self.peak_hold_time.elapsed().as_secs() >= 3 {
            self.peak_hold = normalized;
            self.peak_hold_time = std::time::Instant::now();
        }

        normalized
    }

    /// Processes user input and returns the next recorder command.
    ///
    /// Only Enter (stop) and Escape/'q'/Ctrl-C (cancel) are recognized; all
    /// other keys are ignored.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> Result<RecorderCommand, Box<dyn Error>> {
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Enter => {
                        tracing::debug!("Enter pressed: stopping capture");
                        RecorderCommand::Stop
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: canceling capture");
                        RecorderCommand::Cancel
                    }
                    KeyCode::Char('c')
                        if key
                            .modifiers
                            .contains(crossterm::event::KeyModifiers::CONTROL) =>
                    {
                        tracing::debug!("Ctrl+C pressed: canceling capture");
                        RecorderCommand::Cancel
                    }
                    _ => RecorderCommand::Continue,
                });
            }
        }
        Ok(RecorderCommand::Continue)
    }

    /// Leaves the alternate screen and restores the terminal.
    ///
    /// # Errors
    /// - If terminal state cannot be restored
    pub fn cleanup(&mut self) -> Result<(), Box<dyn Error>> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
