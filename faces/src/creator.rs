//! Persona creation wizard.
//!
//! A three-step interface for forging new AI vessels: identity, personality,
//! and neural configuration.

use crossterm::event::{Event, KeyCode, KeyEvent};
use faces_core::{BrainType, BuildError, CharacterProfile, Persona, PersonaBuilder};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

/// Steps in persona creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStep {
    Designation,
    CharacterCore,
    NeuralConfig,
}

impl CreationStep {
    pub fn title(&self) -> &'static str {
        match self {
            CreationStep::Designation => "Designation",
            CreationStep::CharacterCore => "Character Core",
            CreationStep::NeuralConfig => "Neural Configuration",
        }
    }

    pub fn next(&self) -> Option<CreationStep> {
        match self {
            CreationStep::Designation => Some(CreationStep::CharacterCore),
            CreationStep::CharacterCore => Some(CreationStep::NeuralConfig),
            CreationStep::NeuralConfig => None,
        }
    }

    pub fn prev(&self) -> Option<CreationStep> {
        match self {
            CreationStep::Designation => None,
            CreationStep::CharacterCore => Some(CreationStep::Designation),
            CreationStep::NeuralConfig => Some(CreationStep::CharacterCore),
        }
    }

    fn number(&self) -> usize {
        match self {
            CreationStep::Designation => 1,
            CreationStep::CharacterCore => 2,
            CreationStep::NeuralConfig => 3,
        }
    }
}

/// Which text field on the designation step has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DesignationField {
    #[default]
    Name,
    Role,
    Description,
}

impl DesignationField {
    fn next(self) -> Self {
        match self {
            DesignationField::Name => DesignationField::Role,
            DesignationField::Role => DesignationField::Description,
            DesignationField::Description => DesignationField::Name,
        }
    }
}

/// Persona creation state.
pub struct Creator {
    pub step: CreationStep,
    pub name: String,
    pub role: String,
    pub description: String,
    pub character: CharacterProfile,
    pub brain_type: BrainType,

    // UI state
    field: DesignationField,
    cursor_position: usize,
    pub list_state: ListState,
    pub finished: bool,
    pub cancelled: bool,
}

impl Creator {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            step: CreationStep::Designation,
            name: String::new(),
            role: String::new(),
            description: String::new(),
            character: CharacterProfile::default(),
            brain_type: BrainType::default(),
            field: DesignationField::default(),
            cursor_position: 0,
            list_state,
            finished: false,
            cancelled: false,
        }
    }

    /// Whether the designation step can advance.
    pub fn designation_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.role.trim().is_empty()
    }

    /// Handle keyboard input.
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            match self.step {
                CreationStep::Designation => self.handle_designation(key),
                CreationStep::CharacterCore => {
                    self.handle_list_selection(key, CharacterProfile::all().len())
                }
                CreationStep::NeuralConfig => {
                    self.handle_list_selection(key, BrainType::all().len())
                }
            }
        }
    }

    fn active_buffer(&mut self) -> &mut String {
        match self.field {
            DesignationField::Name => &mut self.name,
            DesignationField::Role => &mut self.role,
            DesignationField::Description => &mut self.description,
        }
    }

    fn handle_designation(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                let pos = self.cursor_position;
                let limit = if self.field == DesignationField::Description {
                    200
                } else {
                    40
                };
                let buffer = self.active_buffer();
                if buffer.chars().count() < limit {
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
                self.field = self.field.next();
                self.cursor_position = self.active_buffer().chars().count();
            }
            KeyCode::Enter => {
                // Step one gates on a name and a functional role.
                if self.designation_complete() {
                    self.advance_step();
                }
            }
            KeyCode::Esc => {
                self.cancelled = true;
            }
            _ => {}
        }
    }

    fn handle_list_selection(&mut self, key: KeyEvent, max_items: usize) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.list_state
                    .select(Some(if i == 0 { max_items - 1 } else { i - 1 }));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some((i + 1) % max_items));
            }
            KeyCode::Enter => {
                self.confirm_selection();
            }
            KeyCode::Esc => {
                if let Some(prev) = self.step.prev() {
                    self.step = prev;
                    self.list_state.select(Some(0));
                } else {
                    self.cancelled = true;
                }
            }
            _ => {}
        }
    }

    fn confirm_selection(&mut self) {
        match self.step {
            CreationStep::CharacterCore => {
                if let Some(i) = self.list_state.selected() {
                    self.character = CharacterProfile::all()[i];
                    self.advance_step();
                }
            }
            CreationStep::NeuralConfig => {
                if let Some(i) = self.list_state.selected() {
                    self.brain_type = BrainType::all()[i];
                    self.finished = true;
                }
            }
            CreationStep::Designation => {}
        }
    }

    fn advance_step(&mut self) {
        if let Some(next) = self.step.next() {
            self.step = next;
            self.list_state.select(Some(0));
        }
    }

    /// Finalize the persona from current selections.
    pub fn build_persona(&self) -> Result<Persona, BuildError> {
        PersonaBuilder::new()
            .name(self.name.trim())
            .role(self.role.trim())
            .character(self.character)
            .description(self.description.trim())
            .brain_type(self.brain_type)
            .build()
    }

    /// Render the creation wizard.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        // Two-column layout: left for the current step, right for the preview
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        let left_block = Block::default()
            .title(format!(
                " Step {}/3: {} ",
                self.step.number(),
                self.step.title()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let left_inner = left_block.inner(columns[0]);
        frame.render_widget(left_block, columns[0]);

        match self.step {
            CreationStep::Designation => self.render_designation(frame, left_inner),
            CreationStep::CharacterCore => self.render_character_core(frame, left_inner),
            CreationStep::NeuralConfig => self.render_neural_config(frame, left_inner),
        }

        self.render_preview(frame, columns[1]);
    }

    fn render_designation(&self, frame: &mut Frame, area: Rect) {
        let field_line = |label: &str, value: &str, focused: bool| {
            let style = if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(format!("{label:<14}"), style),
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
                "Give the vessel an identity.",
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::from(""),
            field_line("Name:", &self.name, self.field == DesignationField::Name),
            Line::from(""),
            field_line("Role:", &self.role, self.field == DesignationField::Role),
            Line::from(""),
            field_line(
                "Description:",
                &self.description,
                self.field == DesignationField::Description,
            ),
            Line::from(""),
            Line::from(Span::styled(
                if self.designation_complete() {
                    "Enter to continue"
                } else {
                    "Name and role are required"
                },
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::from(Span::styled(
                "Tab switches fields, Esc cancels",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn render_character_core(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = CharacterProfile::all()
            .iter()
            .map(|profile| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        profile.name(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {}", profile.description()),
                        Style::default().add_modifier(Modifier::DIM),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_neural_config(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = BrainType::all()
            .iter()
            .map(|brain| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        brain.label(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {}", brain.description()),
                        Style::default().add_modifier(Modifier::DIM),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    /// Render the vessel preview panel.
    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let title = if self.name.is_empty() {
            " Preview ".to_string()
        } else {
            format!(" {} ", self.name)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let value_or = |v: &str, fallback: &str| {
            if v.is_empty() {
                fallback.to_string()
            } else {
                v.to_string()
            }
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("Role: ", Style::default().add_modifier(Modifier::DIM)),
                Span::raw(value_or(&self.role, "???")),
            ]),
            Line::from(vec![
                Span::styled("Core: ", Style::default().add_modifier(Modifier::DIM)),
                Span::raw(self.character.name()),
            ]),
            Line::from(vec![
                Span::styled("Brain: ", Style::default().add_modifier(Modifier::DIM)),
                Span::raw(self.brain_type.label()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                value_or(&self.description, "No description"),
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Knowledge: empty matrix",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            inner,
        );
    }
}
