//! Transcript display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use faces_core::{ChatMessage, Role};

use crate::ui::theme::FacesTheme;

/// Widget for displaying a training transcript
pub struct TranscriptWidget<'a> {
    messages: &'a [ChatMessage],
    scroll: usize,
    theme: &'a FacesTheme,
    focused: bool,
    /// A message still being encoded or awaiting a reply.
    pending_user: Option<&'a str>,
    thinking: bool,
}

impl<'a> TranscriptWidget<'a> {
    pub fn new(messages: &'a [ChatMessage], theme: &'a FacesTheme) -> Self {
        Self {
            messages,
            scroll: 0,
            theme,
            focused: false,
            pending_user: None,
            thinking: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn pending_user(mut self, text: Option<&'a str>) -> Self {
        self.pending_user = text;
        self
    }

    pub fn thinking(mut self, thinking: bool) -> Self {
        self.thinking = thinking;
        self
    }

    fn style_for_role(&self, role: Role) -> Style {
        match role {
            Role::User => self.theme.user_style(),
            Role::Assistant => self.theme.vessel_style(),
            Role::System => self.theme.system_style(),
        }
    }
}

impl Widget for TranscriptWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            " Transcript [j/k scroll] "
        } else {
            " Transcript "
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();

        for message in self.messages {
            let style = self.style_for_role(message.role);
            let prefix = match message.role {
                Role::User => "> ",
                Role::Assistant => "",
                Role::System => "[ ",
            };
            let suffix = match message.role {
                Role::System => " ]",
                _ => "",
            };

            let text = format!("{}{}{}", prefix, message.content, suffix);

            for line in text.lines() {
                lines.push(Line::from(Span::styled(line.to_string(), style)));
            }

            lines.push(Line::from(""));
        }

        if let Some(pending) = self.pending_user {
            let style = self.theme.user_style();
            for line in pending.lines() {
                lines.push(Line::from(Span::styled(format!("> {line}"), style)));
            }
            lines.push(Line::from(""));
        }

        if self.thinking {
            let style = self.theme.vessel_style().add_modifier(Modifier::DIM);
            lines.push(Line::from(Span::styled("▌", style)));
        }

        let visible_height = inner.height as usize;
        let total_lines = lines.len();
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        let paragraph = Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false });

        paragraph.render(inner, buf);

        // Render scrollbar if content exceeds visible area
        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);

            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}
