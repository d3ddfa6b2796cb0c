//! Render orchestration for the FacesOfAI TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use faces_core::{ChatMode, SessionTab};

use crate::app::{App, InputMode, View};
use crate::login::centered_rect_fixed;
use crate::ui::widgets::{InputWidget, RosterWidget, TranscriptWidget};

/// Overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Post-login welcome modal.
    Welcome,
    Help,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    match app.view {
        View::Dashboard => render_dashboard(frame, app, area),
        View::Creator => {
            if let Some(creator) = app.creator.as_mut() {
                creator.render(frame, area);
            }
        }
        View::Chat => render_chat(frame, app, area),
        View::About => render_about(frame, app, area),
    }

    if let Some(overlay) = app.overlay() {
        match overlay {
            Overlay::Welcome => render_welcome_overlay(frame, app, area),
            Overlay::Help => render_help_overlay(frame, app, area),
        }
    }
}

fn dashboard_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Render the dashboard view
fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let [title_area, roster_area, bar_area] = dashboard_layout(area);

    let title = Line::from(vec![
        Span::styled(" FacesOfAI ", app.theme.title_style()),
        Span::styled(
            format!("| Architect: {} ", app.user.name),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), title_area);

    let roster = RosterWidget::new(&app.personas, &app.theme).selected(app.roster_index);
    frame.render_widget(roster, roster_area);

    render_bottom_bar(
        frame,
        app,
        bar_area,
        "j/k select | Enter open | n new | x delete | a about | ? help | q quit",
    );
}

/// Render the chat view
fn render_chat(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let Some(session) = app.session.as_ref() else {
        return;
    };
    let persona = session.persona();

    // Title bar with mode and tab badges
    let tab_label = match session.tab() {
        SessionTab::Training => "TRAINING",
        SessionTab::Deploy => "DEPLOY",
    };
    let title = Line::from(vec![
        Span::styled(format!(" {} ", persona.name), app.theme.title_style()),
        Span::styled(
            format!("| {} truths ", persona.fact_count()),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::styled(
            format!("| {} ", session.mode().label()),
            app.theme.mode_style(session.mode()),
        ),
        Span::styled(
            format!("| {tab_label} "),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    match session.tab() {
        SessionTab::Training => {
            // A queued probe is echoed here until the reply lands; the fact
            // being encoded shows the same way during the teach animation.
            let pending = app
                .encoding_fact()
                .map(|e| e.fact.as_str())
                .or(app.pending_probe.as_deref());
            let transcript = TranscriptWidget::new(session.transcript(), &app.theme)
                .scroll(app.transcript_scroll)
                .focused(app.input_mode == InputMode::Normal)
                .pending_user(pending)
                .thinking(app.busy());
            frame.render_widget(transcript, chunks[1]);
        }
        SessionTab::Deploy => render_deploy_pane(frame, app, chunks[1]),
    }

    // Input area
    let is_active = matches!(app.input_mode, InputMode::Insert | InputMode::Command);
    let is_command = matches!(app.input_mode, InputMode::Command);
    let placeholder = match session.mode() {
        _ if app.busy() => "Processing...",
        ChatMode::Teach => "Encode a permanent truth...",
        ChatMode::Probe => "Probe the neural matrix...",
    };
    let input = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .mode(session.mode())
        .active(is_active)
        .command_mode(is_command)
        .placeholder(placeholder);
    frame.render_widget(input, chunks[2]);

    render_bottom_bar(
        frame,
        app,
        chunks[3],
        "i type | t teach/probe | Tab deploy | j/k scroll | Esc back",
    );
}

/// Render the deploy tab with the embed snippet
fn render_deploy_pane(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let persona = session.persona();

    let block = Block::default()
        .title(" Deploy ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Persona ID: ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(persona.id.clone()),
        ]),
        Line::from(vec![
            Span::styled("API key:    ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(persona.api_key.clone(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    match session.snippet() {
        Some(snippet) => {
            for line in snippet.lines() {
                lines.push(Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::Green),
                )));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Generating embed snippet...",
                app.theme.system_style(),
            )));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        inner,
    );
}

/// Render the about view
fn render_about(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect_fixed(60, 16, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(
            "FacesOfAI",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Forge zero-knowledge AI vessels."),
        Line::from(""),
        Line::from("Every persona starts as an empty neural matrix. It knows"),
        Line::from("nothing until you teach it, truth by truth, and answers"),
        Line::from("probes only from what it has been taught."),
        Line::from(""),
        Line::from("TEACH encodes a permanent fact. PROBE tests recall."),
        Line::from("The deploy tab generates an embed snippet for your site."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to return",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" About ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

/// Render the bottom status / hotkey bar
fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect, hotkeys: &str) {
    let line = match app.status_message() {
        Some(message) => Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(app.theme.accent),
        )),
        None => Line::from(Span::styled(
            format!(" {hotkeys} "),
            Style::default().add_modifier(Modifier::DIM),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the post-login welcome modal
fn render_welcome_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect_fixed(50, 9, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(
            format!("Welcome, {}.", app.user.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Neural grid access granted. Your vessels await."),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Access Granted ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect_fixed(52, 20, area);
    frame.render_widget(Clear, popup);

    let help_text = vec![
        Line::from(Span::styled(
            " FacesOfAI - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Dashboard:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  j/k     Select vessel"),
        Line::from("  Enter   Open training session"),
        Line::from("  n       Forge a new vessel"),
        Line::from("  x       Decommission vessel"),
        Line::from("  a       About"),
        Line::from(""),
        Line::from(Span::styled(
            "Training session:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  i       Type a message"),
        Line::from("  t       Toggle TEACH / PROBE"),
        Line::from("  Tab     Switch to deploy tab"),
        Line::from("  j/k     Scroll transcript"),
        Line::from("  Esc     Back to dashboard"),
        Line::from(""),
        Line::from(Span::styled(
            "Commands:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  :q      Quit    :new  New vessel    :logout  Sign out"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(help_text).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use faces_core::{PersonaBuilder, ProfileStore, User, VesselMind};
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        let store = ProfileStore::new("/tmp/faces-render-tests");
        let mind = VesselMind::new("test-key");
        let user = User {
            name: "Tester".to_string(),
            email: "t@t.t".to_string(),
        };
        let persona = PersonaBuilder::new()
            .name("VESSEL")
            .role("R")
            .build()
            .unwrap();
        App::new(store, mind, user, vec![persona])
    }

    fn draw_to_string(app: &mut App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_queued_probe_is_echoed_while_synchronizing() {
        let mut app = test_app();
        app.open_selected();
        if let Some(session) = app.session.as_mut() {
            session.set_mode(ChatMode::Probe);
        }
        app.queue_probe("what color is the sky".to_string());

        let screen = draw_to_string(&mut app);
        assert!(screen.contains("what color is the sky"));
    }

    #[test]
    fn test_encoding_fact_is_echoed_during_teach_latency() {
        let mut app = test_app();
        app.open_selected();
        app.queue_teach("The sky is green.".to_string());

        let screen = draw_to_string(&mut app);
        assert!(screen.contains("The sky is green."));
    }
}
