//! Persona roster widget for the dashboard

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use faces_core::{BrainType, Persona};

use crate::ui::theme::FacesTheme;

/// Widget listing deployed personas with their training state
pub struct RosterWidget<'a> {
    personas: &'a [Persona],
    theme: &'a FacesTheme,
    selected: usize,
}

impl<'a> RosterWidget<'a> {
    pub fn new(personas: &'a [Persona], theme: &'a FacesTheme) -> Self {
        Self {
            personas,
            theme,
            selected: 0,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }
}

impl Widget for RosterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = if self.personas.is_empty() {
            vec![ListItem::new(Line::from(Span::styled(
                "No vessels deployed. Press 'n' to forge one.",
                self.theme.system_style(),
            )))]
        } else {
            self.personas
                .iter()
                .map(|persona| {
                    let facts = persona.fact_count();
                    let truth_label = if facts == 1 { "truth" } else { "truths" };
                    let high = persona.brain_type == BrainType::HighPerformance;

                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(
                                persona.name.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw("  "),
                            Span::styled(
                                persona.brain_type.label(),
                                self.theme.brain_style(high),
                            ),
                        ]),
                        Line::from(vec![
                            Span::styled(
                                format!("  {}", persona.role),
                                self.theme.system_style(),
                            ),
                            Span::styled(
                                format!("  ({facts} {truth_label})"),
                                self.theme.system_style(),
                            ),
                        ]),
                    ])
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Vessels ")
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style(true)),
            )
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.personas.is_empty() {
            state.select(Some(self.selected.min(self.personas.len() - 1)));
        }

        StatefulWidget::render(list, area, buf, &mut state);
    }
}
