//! Event handling for the FacesOfAI TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use faces_core::ChatMode;

use crate::app::{App, InputMode, View};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    // The creation wizard owns its own event handling
    if app.view == View::Creator && !app.has_overlay() {
        if let Event::Key(key) = &event {
            if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
                return EventResult::Quit;
            }
        }
        return handle_creator_event(app, event);
    }

    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Delegate an event to the creation wizard and resolve its outcome
fn handle_creator_event(app: &mut App, event: Event) -> EventResult {
    let outcome = match app.creator.as_mut() {
        Some(creator) => {
            creator.handle_event(event);
            if creator.cancelled {
                None
            } else if creator.finished {
                Some(creator.build_persona())
            } else {
                return EventResult::NeedsRedraw;
            }
        }
        None => {
            app.view = View::Dashboard;
            return EventResult::NeedsRedraw;
        }
    };

    match outcome {
        None => app.cancel_creator(),
        Some(Ok(persona)) => app.add_persona(persona),
        Some(Err(e)) => {
            // Shouldn't happen past the designation gate; let them retry.
            if let Some(creator) = app.creator.as_mut() {
                creator.finished = false;
            }
            app.set_status(format!("Creation failed: {e}"));
        }
    }

    EventResult::NeedsRedraw
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Handle overlay keys first
    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    match app.view {
        View::Dashboard => handle_dashboard(app, key),
        View::Creator => EventResult::Continue, // Creator has its own handler
        View::Chat => handle_chat(app, key),
        View::About => handle_about(app, key),
    }
}

/// Handle keys on the dashboard
fn handle_dashboard(app: &mut App, key: KeyEvent) -> EventResult {
    if app.input_mode == InputMode::Command {
        return handle_command_mode(app, key);
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.roster_next();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.roster_prev();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.open_selected();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('n') => {
            app.start_creator();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('x') => {
            app.delete_selected();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('a') => {
            app.view = View::About;
            EventResult::NeedsRedraw
        }
        KeyCode::Char(':') => {
            app.enter_command_mode();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => EventResult::Quit,
        _ => EventResult::Continue,
    }
}

/// Handle keys in the chat view
fn handle_chat(app: &mut App, key: KeyEvent) -> EventResult {
    match app.input_mode {
        InputMode::Normal => handle_chat_normal(app, key),
        InputMode::Insert => handle_chat_insert(app, key),
        InputMode::Command => handle_command_mode(app, key),
    }
}

/// Handle keys in chat NORMAL mode (vim-style navigation and hotkeys)
fn handle_chat_normal(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('i') => {
            app.input_mode = InputMode::Insert;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('a') => {
            app.input_mode = InputMode::Insert;
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(':') => {
            app.enter_command_mode();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('t') => {
            if let Some(session) = app.session.as_mut() {
                session.toggle_mode();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Tab => {
            app.toggle_session_tab();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        // Leaving chat deselects the persona
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_session();
            EventResult::NeedsRedraw
        }

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('G') => {
            app.scroll_to_bottom();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.transcript_scroll = 0;
            app.scroll_locked_to_bottom = false;
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp | KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown | KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle keys in chat INSERT mode (free text input)
fn handle_chat_insert(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            EventResult::NeedsRedraw
        }

        // Submit input
        KeyCode::Enter => {
            // One message at a time while work is in flight
            if app.busy() {
                return EventResult::Continue;
            }
            if let Some(input) = app.submit_input() {
                match app.chat_mode() {
                    ChatMode::Teach => app.queue_teach(input),
                    ChatMode::Probe => app.queue_probe(input),
                }
            }
            EventResult::NeedsRedraw
        }

        // Input editing
        KeyCode::Left => {
            app.cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.delete();
            EventResult::NeedsRedraw
        }
        KeyCode::Up => {
            app.history_prev();
            EventResult::NeedsRedraw
        }
        KeyCode::Down => {
            app.history_next();
            EventResult::NeedsRedraw
        }

        // Character input
        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in COMMAND mode (: commands)
fn handle_command_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.enter_normal_mode();
            EventResult::NeedsRedraw
        }

        KeyCode::Enter => {
            let command = app.input_buffer().to_string();
            app.clear_input();
            app.input_mode = InputMode::Normal;

            if command.len() > 1 {
                app.process_command(&command);
            }

            if app.should_quit {
                EventResult::Quit
            } else {
                EventResult::NeedsRedraw
            }
        }

        KeyCode::Left => {
            if app.cursor_position() > 1 {
                app.cursor_left();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            if app.cursor_position() > 1 {
                app.backspace();
            } else {
                // Backspace on just ":" exits command mode
                app.input_mode = InputMode::Normal;
                app.clear_input();
            }
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in the about view
fn handle_about(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
            app.view = View::Dashboard;
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char(' ') => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faces_core::{PersonaBuilder, ProfileStore, SessionTab, User, VesselMind};

    fn test_app() -> App {
        let store = ProfileStore::new("/tmp/faces-event-tests");
        let mind = VesselMind::new("test-key");
        let user = User {
            name: "T".to_string(),
            email: "t@t.t".to_string(),
        };
        let persona = PersonaBuilder::new()
            .name("VESSEL")
            .role("R")
            .build()
            .unwrap();
        App::new(store, mind, user, vec![persona])
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_enter_opens_chat_and_escape_deselects() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.view, View::Chat);
        assert!(app.session.is_some());

        handle_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.view, View::Dashboard);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_teach_input_is_queued() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Enter));
        handle_event(&mut app, key(KeyCode::Char('i')));
        assert_eq!(app.input_mode, InputMode::Insert);

        for c in "fact".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter));

        assert!(app.encoding_fact().is_some());
        assert!(app.input_buffer().is_empty());
    }

    #[test]
    fn test_probe_mode_queues_async_work() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Enter));
        handle_event(&mut app, key(KeyCode::Char('t'))); // toggle to PROBE
        handle_event(&mut app, key(KeyCode::Char('i')));
        for c in "hello".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter));

        assert_eq!(app.pending_probe.as_deref(), Some("hello"));
    }

    #[test]
    fn test_tab_switches_to_deploy() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Enter));
        handle_event(&mut app, key(KeyCode::Tab));

        assert_eq!(
            app.session.as_ref().map(|s| s.tab()),
            Some(SessionTab::Deploy)
        );
        assert!(app.pending_snippet);
    }

    #[test]
    fn test_wizard_creates_and_prepends_persona() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.view, View::Creator);

        for c in "NEW".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Tab));
        for c in "Role".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter)); // designation done
        handle_event(&mut app, key(KeyCode::Enter)); // character core
        handle_event(&mut app, key(KeyCode::Enter)); // neural config

        assert_eq!(app.view, View::Dashboard);
        assert_eq!(app.personas.len(), 2);
        assert_eq!(app.personas[0].name, "NEW");
        assert!(app.creator.is_none());
    }

    #[test]
    fn test_quit_from_dashboard() {
        let mut app = test_app();
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('q'))), EventResult::Quit);
    }
}
