//! Login screen.
//!
//! A two-field sign-in form shown before the main app when no user record
//! exists. Submission plays a short "Syncing Neural Data" animation before
//! handing the user off, matching the platform's staged-boot aesthetic.

use crossterm::event::{Event, KeyCode, KeyEvent};
use faces_core::User;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Frames of the sync animation at the 100ms poll cadence (~1.2 sec).
const SYNC_FRAMES: u8 = 12;

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LoginField {
    #[default]
    Name,
    Email,
}

/// Login form state.
pub struct Login {
    name: String,
    email: String,
    field: LoginField,
    cursor_position: usize,
    syncing: Option<u8>,
    pub finished: bool,
    pub cancelled: bool,
}

impl Login {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            field: LoginField::default(),
            cursor_position: 0,
            syncing: None,
            finished: false,
            cancelled: false,
        }
    }

    fn active_buffer(&mut self) -> &mut String {
        match self.field {
            LoginField::Name => &mut self.name,
            LoginField::Email => &mut self.email,
        }
    }

    fn can_submit(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }

    /// Handle keyboard input. Ignored while the sync animation plays.
    pub fn handle_event(&mut self, event: Event) {
        if self.syncing.is_some() {
            return;
        }
        if let Event::Key(key) = event {
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                let pos = self.cursor_position;
                let buffer = self.active_buffer();
                if buffer.chars().count() < 60 {
                    let byte_pos = buffer
                        .char_indices()
                        .nth(pos)
                        .map(|(i, _)| i)
                        .unwrap_or(buffer.len());
                    buffer.insert(byte_pos, c);
                    self.cursor_position += 1;
                }
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let pos = self.cursor_position;
                    let buffer = self.active_buffer();
                    if let Some((byte_pos, ch)) = buffer.char_indices().nth(pos) {
                        buffer.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
                    }
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                let len = self.active_buffer().chars().count();
                self.cursor_position = (self.cursor_position + 1).min(len);
            }
            KeyCode::Tab | KeyCode::Down => {
                self.switch_field();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.switch_field();
            }
            KeyCode::Enter => {
                if self.field == LoginField::Name {
                    self.switch_field();
                } else if self.can_submit() {
                    self.syncing = Some(0);
                }
            }
            KeyCode::Esc => {
                self.cancelled = true;
            }
            _ => {}
        }
    }

    fn switch_field(&mut self) {
        self.field = match self.field {
            LoginField::Name => LoginField::Email,
            LoginField::Email => LoginField::Name,
        };
        self.cursor_position = match self.field {
            LoginField::Name => self.name.chars().count(),
            LoginField::Email => self.email.chars().count(),
        };
    }

    /// Advance the sync animation; marks the form finished when it completes.
    pub fn tick(&mut self) {
        if let Some(frames) = self.syncing.as_mut() {
            *frames += 1;
            if *frames >= SYNC_FRAMES {
                self.finished = true;
            }
        }
    }

    /// Build the user record from the submitted form.
    pub fn build_user(&self) -> User {
        User {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    /// Render the login screen.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let popup = centered_rect_fixed(52, 14, area);

        let block = Block::default()
            .title(" FacesOfAI :: Neural Access ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        if self.syncing.is_some() {
            let dots = ".".repeat(((self.syncing.unwrap_or(0) / 3) % 4) as usize);
            let lines = vec![
                Line::from(""),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Syncing Neural Data{dots}"),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let field_line = |label: &str, value: &str, focused: bool| {
            let style = if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(format!("{label:<10}"), style),
                Span::raw(value.to_string()),
                if focused {
                    Span::styled("▌", Style::default().fg(Color::Cyan))
                } else {
                    Span::raw("")
                },
            ])
        };

        let lines = vec![
            Line::from(Span::styled(
                "Identify yourself to the grid.",
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::from(""),
            field_line("Name:", &self.name, self.field == LoginField::Name),
            Line::from(""),
            field_line("Email:", &self.email, self.field == LoginField::Email),
            Line::from(""),
            Line::from(Span::styled(
                if self.can_submit() {
                    "Enter to initialize session"
                } else {
                    "Both fields are required"
                },
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::from(Span::styled(
                "Tab switches fields, Esc exits",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// A fixed-size rect centered in `area`, clamped to fit.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
