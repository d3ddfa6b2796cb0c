//! Color theme and styling for the FacesOfAI TUI

use faces_core::ChatMode;
use ratatui::style::{Color, Modifier, Style};

/// App UI color theme
#[derive(Debug, Clone)]
pub struct FacesTheme {
    // Base colors
    pub border: Color,
    pub border_focused: Color,

    // Transcript colors
    pub user_text: Color,
    pub vessel_text: Color,
    pub system_text: Color,

    // Mode colors
    pub teach: Color,
    pub probe: Color,

    // Accents
    pub accent: Color,
}

impl Default for FacesTheme {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            user_text: Color::Cyan,
            vessel_text: Color::White,
            system_text: Color::DarkGray,

            teach: Color::Green,
            probe: Color::Magenta,

            accent: Color::Cyan,
        }
    }
}

impl FacesTheme {
    /// Get style for user messages
    pub fn user_style(&self) -> Style {
        Style::default()
            .fg(self.user_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for vessel replies
    pub fn vessel_style(&self) -> Style {
        Style::default().fg(self.vessel_text)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get style for the active chat mode badge
    pub fn mode_style(&self, mode: ChatMode) -> Style {
        let color = match mode {
            ChatMode::Teach => self.teach,
            ChatMode::Probe => self.probe,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a brain-tier badge
    pub fn brain_style(&self, high_performance: bool) -> Style {
        if high_performance {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Blue)
        }
    }
}
