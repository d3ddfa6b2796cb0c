//! Message input widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use faces_core::ChatMode;

use crate::ui::theme::FacesTheme;

/// Single-line message input with a mode-aware prompt.
///
/// Inside a session the prompt glyph, badge, and border take the active
/// mode's color, so the architect can tell at a glance whether the next
/// line becomes a permanent truth or a probe.
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a FacesTheme,
    mode: Option<ChatMode>,
    placeholder: &'a str,
    is_active: bool,
    is_command_mode: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a FacesTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            mode: None,
            placeholder: "Enter a message...",
            is_active: true,
            is_command_mode: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    /// Color the prompt and border after the session's chat mode.
    pub fn mode(mut self, mode: ChatMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    pub fn command_mode(mut self, is_command: bool) -> Self {
        self.is_command_mode = is_command;
        self
    }

    fn prompt(&self) -> (&'static str, Style) {
        if self.is_command_mode {
            return (":", Style::default().fg(self.theme.accent));
        }
        match self.mode {
            Some(ChatMode::Teach) => ("+ ", self.theme.mode_style(ChatMode::Teach)),
            Some(ChatMode::Probe) => ("? ", self.theme.mode_style(ChatMode::Probe)),
            None => ("> ", self.theme.user_style()),
        }
    }

    fn badge(&self) -> &'static str {
        match (self.is_command_mode, self.mode) {
            (true, _) => " COMMAND ",
            (false, Some(ChatMode::Teach)) => " TEACH ",
            (false, Some(ChatMode::Probe)) => " PROBE ",
            (false, None) => " Input ",
        }
    }

    fn border_style(&self) -> Style {
        match self.mode {
            Some(mode) if self.is_active && !self.is_command_mode => self.theme.mode_style(mode),
            _ => self.theme.border_style(self.is_active),
        }
    }

    /// Split text around the cursor on char boundaries.
    ///
    /// A cursor past the end yields a space so the cursor cell stays visible.
    fn split_at_cursor(text: &str, cursor: usize) -> (&str, String, &str) {
        match text.char_indices().nth(cursor) {
            Some((start, ch)) => {
                let end = start + ch.len_utf8();
                (&text[..start], ch.to_string(), &text[end..])
            }
            None => (text, " ".to_string(), ""),
        }
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.badge())
            .borders(Borders::ALL)
            .border_style(self.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let (prompt, prompt_style) = self.prompt();

        // The ':' lives in the buffer but is drawn as the prompt glyph.
        let (text, cursor) = if self.is_command_mode && self.content.starts_with(':') {
            (&self.content[1..], self.cursor_position.saturating_sub(1))
        } else {
            (self.content, self.cursor_position)
        };

        let line = if text.is_empty() && !self.is_command_mode {
            Line::from(vec![
                Span::styled(prompt, prompt_style),
                Span::styled(
                    self.placeholder,
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ])
        } else {
            let (before, at, after) = Self::split_at_cursor(text, cursor);
            Line::from(vec![
                Span::styled(prompt, prompt_style),
                Span::raw(before),
                Span::styled(
                    at,
                    Style::default()
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                        .fg(self.theme.user_text),
                ),
                Span::raw(after),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_follows_chat_mode() {
        let theme = FacesTheme::default();

        let teach = InputWidget::new("", &theme).mode(ChatMode::Teach);
        assert_eq!(teach.prompt().0, "+ ");
        assert_eq!(teach.badge(), " TEACH ");
        assert_eq!(teach.border_style(), theme.mode_style(ChatMode::Teach));

        let probe = InputWidget::new("", &theme).mode(ChatMode::Probe);
        assert_eq!(probe.prompt().0, "? ");
        assert_eq!(probe.badge(), " PROBE ");
    }

    #[test]
    fn test_command_mode_overrides_mode_styling() {
        let theme = FacesTheme::default();
        let w = InputWidget::new(":quit", &theme)
            .mode(ChatMode::Teach)
            .command_mode(true);

        assert_eq!(w.prompt().0, ":");
        assert_eq!(w.badge(), " COMMAND ");
        assert_eq!(w.border_style(), theme.border_style(true));
    }

    #[test]
    fn test_cursor_split_is_unicode_safe() {
        let (before, at, after) = InputWidget::split_at_cursor("héllo", 1);
        assert_eq!(before, "h");
        assert_eq!(at, "é");
        assert_eq!(after, "llo");

        let (before, at, _) = InputWidget::split_at_cursor("hé", 2);
        assert_eq!(before, "hé");
        assert_eq!(at, " ");
    }
}
