//! Main application state and logic

use std::collections::VecDeque;

use faces_core::{
    ChatMode, ChatSession, Persona, ProfileStore, SessionTab, User, VesselMind,
};

use crate::creator::Creator;
use crate::ui::theme::FacesTheme;
use crate::ui::Overlay;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - free text input
    Insert,
    /// Command mode - entering : commands
    Command,
}

/// Top-level view router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Creator,
    Chat,
    About,
}

/// A fact being encoded (for the teach latency animation)
#[derive(Debug, Clone)]
pub struct EncodingFact {
    /// The fact text awaiting commitment.
    pub fact: String,
    /// Number of animation frames elapsed.
    pub frames_elapsed: u8,
}

/// Main application state
pub struct App {
    // Persistence and AI
    pub store: ProfileStore,
    pub mind: VesselMind,

    // Domain state
    pub user: User,
    pub personas: Vec<Persona>,
    pub session: Option<ChatSession>,

    // View routing
    pub view: View,
    pub creator: Option<Creator>,
    pub roster_index: usize,
    overlay: Option<Overlay>,

    // Transcript display
    pub transcript_scroll: usize,
    pub scroll_locked_to_bottom: bool,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,
    pub input_history: VecDeque<String>,
    pub history_index: Option<usize>,
    pub saved_input: Option<String>,

    // Pending async work, drained by the main loop
    pub pending_probe: Option<String>,
    pub pending_snippet: bool,
    pub roster_dirty: bool,
    encoding_fact: Option<EncodingFact>,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
    pub should_logout: bool,

    pub theme: FacesTheme,
}

impl App {
    pub fn new(store: ProfileStore, mind: VesselMind, user: User, personas: Vec<Persona>) -> Self {
        Self {
            store,
            mind,
            user,
            personas,
            session: None,
            view: View::Dashboard,
            creator: None,
            roster_index: 0,
            overlay: None,
            transcript_scroll: 0,
            scroll_locked_to_bottom: true,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            input_history: VecDeque::with_capacity(100),
            history_index: None,
            saved_input: None,
            pending_probe: None,
            pending_snippet: false,
            roster_dirty: false,
            encoding_fact: None,
            status_message: None,
            should_quit: false,
            should_logout: false,
            theme: FacesTheme::default(),
        }
    }

    // =========================================================================
    // View routing
    // =========================================================================

    /// Move the roster cursor up.
    pub fn roster_prev(&mut self) {
        if !self.personas.is_empty() {
            self.roster_index = if self.roster_index == 0 {
                self.personas.len() - 1
            } else {
                self.roster_index - 1
            };
        }
    }

    /// Move the roster cursor down.
    pub fn roster_next(&mut self) {
        if !self.personas.is_empty() {
            self.roster_index = (self.roster_index + 1) % self.personas.len();
        }
    }

    /// Open a training session on the persona under the roster cursor.
    pub fn open_selected(&mut self) {
        if let Some(persona) = self.personas.get(self.roster_index) {
            let name = persona.name.clone();
            self.session = Some(ChatSession::open(persona.clone()));
            self.view = View::Chat;
            self.input_mode = InputMode::Normal;
            self.scroll_to_bottom();
            self.set_status(format!("Linked to {name}"));
        }
    }

    /// Leave the chat view, deselecting the active persona.
    ///
    /// Any facts taught this session are folded back into the roster.
    pub fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            let persona = session.into_persona();
            self.sync_roster_entry(persona);
        }
        self.encoding_fact = None;
        self.pending_probe = None;
        self.pending_snippet = false;
        self.clear_input();
        self.input_mode = InputMode::Normal;
        self.view = View::Dashboard;
    }

    /// Enter the creation wizard.
    pub fn start_creator(&mut self) {
        self.creator = Some(Creator::new());
        self.view = View::Creator;
    }

    /// Leave the creation wizard without building anything.
    pub fn cancel_creator(&mut self) {
        self.creator = None;
        self.view = View::Dashboard;
    }

    /// Add a freshly created persona to the front of the roster.
    pub fn add_persona(&mut self, persona: Persona) {
        self.set_status(format!("Vessel {} deployed", persona.name));
        self.personas.insert(0, persona);
        self.roster_index = 0;
        self.roster_dirty = true;
        self.creator = None;
        self.view = View::Dashboard;
    }

    /// Delete the persona under the roster cursor.
    pub fn delete_selected(&mut self) {
        if self.roster_index < self.personas.len() {
            let removed = self.personas.remove(self.roster_index);
            self.roster_index = self.roster_index.min(self.personas.len().saturating_sub(1));
            self.roster_dirty = true;
            self.set_status(format!("Vessel {} decommissioned", removed.name));
        }
    }

    /// Write a session's persona back over its roster entry.
    fn sync_roster_entry(&mut self, persona: Persona) {
        if let Some(slot) = self.personas.iter_mut().find(|p| p.id == persona.id) {
            *slot = persona;
            self.roster_dirty = true;
        }
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Queue a fact for encoding with the teach latency animation.
    pub fn queue_teach(&mut self, fact: String) {
        if fact.trim().is_empty() {
            return;
        }
        self.encoding_fact = Some(EncodingFact {
            fact,
            frames_elapsed: 0,
        });
        self.set_status("Encoding truth...");
        self.scroll_to_bottom();
    }

    /// The fact currently being encoded, if any.
    pub fn encoding_fact(&self) -> Option<&EncodingFact> {
        self.encoding_fact.as_ref()
    }

    /// Queue a probe for the main loop to dispatch.
    pub fn queue_probe(&mut self, message: String) {
        if message.trim().is_empty() {
            return;
        }
        self.pending_probe = Some(message);
        self.set_status("Synchronizing...");
        self.scroll_to_bottom();
    }

    /// Switch the session tab, queuing snippet generation on first visit.
    pub fn set_session_tab(&mut self, tab: SessionTab) {
        if let Some(session) = self.session.as_mut() {
            session.set_tab(tab);
            if tab == SessionTab::Deploy && session.snippet().is_none() {
                self.pending_snippet = true;
                self.set_status("Generating embed snippet...");
            }
        }
    }

    /// Toggle between the training and deploy tabs.
    pub fn toggle_session_tab(&mut self) {
        let tab = match self.session.as_ref().map(|s| s.tab()) {
            Some(SessionTab::Training) => SessionTab::Deploy,
            Some(SessionTab::Deploy) => SessionTab::Training,
            None => return,
        };
        self.set_session_tab(tab);
    }

    /// Current chat mode, defaulting to TEACH outside a session.
    pub fn chat_mode(&self) -> ChatMode {
        self.session
            .as_ref()
            .map(|s| s.mode())
            .unwrap_or_default()
    }

    /// Whether async work or the encode animation is in flight.
    pub fn busy(&self) -> bool {
        self.encoding_fact.is_some() || self.pending_probe.is_some() || self.pending_snippet
    }

    // =========================================================================
    // Async work, drained once per main-loop iteration
    // =========================================================================

    /// Process queued probes, snippet generation, and roster saves.
    pub async fn process_pending_work(&mut self) {
        if let Some(message) = self.pending_probe.take() {
            if let Some(session) = self.session.as_mut() {
                session.probe(&self.mind, &message).await;
                let persona = session.persona().clone();
                self.sync_roster_entry(persona);
            }
            self.clear_status();
            if self.scroll_locked_to_bottom {
                self.scroll_to_bottom();
            }
        }

        if self.pending_snippet {
            self.pending_snippet = false;
            if let Some(session) = self.session.as_mut() {
                session.ensure_snippet(&self.mind).await;
            }
            self.clear_status();
        }

        if self.roster_dirty {
            self.roster_dirty = false;
            if let Err(e) = self.store.save_personas(&self.personas).await {
                log::error!("failed to persist roster: {e}");
                self.set_status(format!("Save failed: {e}"));
            }
        }
    }

    /// Tick for animations.
    pub fn tick(&mut self) {
        // Commit the encoding fact after ~8 frames (~0.8 sec at 100ms poll)
        let ready = self
            .encoding_fact
            .as_mut()
            .map(|encoding| {
                encoding.frames_elapsed += 1;
                encoding.frames_elapsed >= 8
            })
            .unwrap_or(false);

        if ready {
            if let Some(encoding) = self.encoding_fact.take() {
                if let Some(session) = self.session.as_mut() {
                    session.teach(encoding.fact);
                    let persona = session.persona().clone();
                    self.sync_roster_entry(persona);
                }
                self.clear_status();
                if self.scroll_locked_to_bottom {
                    self.scroll_to_bottom();
                }
            }
        }
    }

    // =========================================================================
    // Transcript scrolling
    // =========================================================================

    /// Scroll transcript to bottom and lock to bottom
    pub fn scroll_to_bottom(&mut self) {
        // Set to max value - the widget will cap it to actual max_scroll
        self.transcript_scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    /// Estimate max scroll based on transcript content
    /// Uses conservative estimate assuming ~60 char effective width
    fn estimate_max_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 60;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 20;

        let Some(session) = self.session.as_ref() else {
            return 0;
        };

        let estimated_lines: usize = session
            .transcript()
            .iter()
            .map(|message| {
                message
                    .content
                    .lines()
                    .map(|line| (line.len() / ESTIMATED_WIDTH).max(1))
                    .sum::<usize>()
                    + 1 // blank line between entries
            })
            .sum();

        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    /// Scroll transcript up (unlocks from bottom)
    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        if self.transcript_scroll > max_scroll {
            self.transcript_scroll = max_scroll;
        }
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    /// Scroll transcript down
    pub fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines);
        let max_scroll = self.estimate_max_scroll();
        self.transcript_scroll = self.transcript_scroll.min(max_scroll + 100);
    }

    // =========================================================================
    // Input editing
    // =========================================================================

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer.clear();
        self.input_buffer.push(':');
        self.cursor_position = 1;
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        if self.input_buffer.starts_with(':') {
            self.input_buffer.clear();
            self.cursor_position = 0;
        }
    }

    /// Submit current input
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        if !input.starts_with(':') {
            self.input_history.push_front(input.clone());
            if self.input_history.len() > 100 {
                self.input_history.pop_back();
            }
        }
        self.history_index = None;
        self.saved_input = None;

        Some(input)
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        let char_count = self.input_buffer.chars().count();
        if self.cursor_position < char_count {
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    /// Move cursor to start
    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    /// Move cursor to end (unicode-safe)
    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Navigate to previous input in history
    pub fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }

        if self.history_index.is_none() && !self.input_buffer.is_empty() {
            self.saved_input = Some(self.input_buffer.clone());
        }

        let new_index = match self.history_index {
            None => Some(0),
            Some(i) if i + 1 < self.input_history.len() => Some(i + 1),
            Some(i) => Some(i),
        };

        if let Some(idx) = new_index {
            if let Some(entry) = self.input_history.get(idx) {
                self.input_buffer = entry.clone();
                self.cursor_position = self.input_buffer.chars().count();
                self.history_index = new_index;
            }
        }
    }

    /// Navigate to next input in history
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.input_buffer = self.saved_input.take().unwrap_or_default();
                self.cursor_position = self.input_buffer.chars().count();
                self.history_index = None;
            }
            Some(i) => {
                if let Some(entry) = self.input_history.get(i - 1) {
                    self.input_buffer = entry.clone();
                    self.cursor_position = self.input_buffer.chars().count();
                    self.history_index = Some(i - 1);
                }
            }
        }
    }

    // =========================================================================
    // Overlays and status
    // =========================================================================

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    /// Show the post-login welcome overlay.
    pub fn show_welcome(&mut self) {
        self.overlay = Some(Overlay::Welcome);
    }

    /// Close any open overlay
    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Process a colon command
    pub fn process_command(&mut self, command: &str) {
        let cmd = command.trim_start_matches(':');
        let parts: Vec<&str> = cmd.split_whitespace().collect();

        match parts.first().copied() {
            None => {}
            Some("q") | Some("quit") | Some("exit") => {
                self.should_quit = true;
            }
            Some("new") => {
                self.close_session();
                self.start_creator();
            }
            Some("home") | Some("dash") => {
                self.close_session();
            }
            Some("about") => {
                self.close_session();
                self.view = View::About;
            }
            Some("logout") => {
                self.should_logout = true;
            }
            Some("help") | Some("h") => {
                self.toggle_help();
            }
            Some(other) => {
                self.set_status(format!("Unknown command: {other}"));
            }
        }
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Set input buffer content and move cursor to end (unicode-safe)
    pub fn set_input(&mut self, content: impl Into<String>) {
        self.input_buffer = content.into();
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Clear the input buffer
    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faces_core::PersonaBuilder;

    fn test_app() -> App {
        let store = ProfileStore::new("/tmp/faces-app-tests");
        let mind = VesselMind::new("test-key");
        let user = User {
            name: "Tester".to_string(),
            email: "t@t.t".to_string(),
        };
        App::new(store, mind, user, Vec::new())
    }

    fn persona(name: &str) -> Persona {
        PersonaBuilder::new().name(name).role("R").build().unwrap()
    }

    #[test]
    fn test_new_persona_goes_to_front() {
        let mut app = test_app();
        app.add_persona(persona("FIRST"));
        app.add_persona(persona("SECOND"));

        assert_eq!(app.personas[0].name, "SECOND");
        assert_eq!(app.personas[1].name, "FIRST");
        assert_eq!(app.roster_index, 0);
        assert!(app.roster_dirty);
    }

    #[test]
    fn test_open_and_close_session() {
        let mut app = test_app();
        app.add_persona(persona("VESSEL"));

        app.open_selected();
        assert_eq!(app.view, View::Chat);
        assert!(app.session.is_some());

        app.close_session();
        assert_eq!(app.view, View::Dashboard);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_taught_facts_fold_back_into_roster() {
        let mut app = test_app();
        app.add_persona(persona("VESSEL"));
        app.open_selected();

        if let Some(session) = app.session.as_mut() {
            session.teach("A truth.");
        }
        app.close_session();

        assert_eq!(app.personas[0].fact_count(), 1);
        assert!(app.roster_dirty);
    }

    #[test]
    fn test_encoding_commits_after_latency() {
        let mut app = test_app();
        app.add_persona(persona("VESSEL"));
        app.roster_dirty = false;
        app.open_selected();

        app.queue_teach("Water is wet.".to_string());
        assert!(app.busy());

        for _ in 0..8 {
            app.tick();
        }

        assert!(app.encoding_fact().is_none());
        assert_eq!(app.session.as_ref().unwrap().persona().fact_count(), 1);
        assert!(app.roster_dirty);
    }

    #[test]
    fn test_roster_navigation_wraps() {
        let mut app = test_app();
        app.add_persona(persona("A"));
        app.add_persona(persona("B"));

        assert_eq!(app.roster_index, 0);
        app.roster_next();
        assert_eq!(app.roster_index, 1);
        app.roster_next();
        assert_eq!(app.roster_index, 0);
        app.roster_prev();
        assert_eq!(app.roster_index, 1);
    }

    #[test]
    fn test_delete_selected_clamps_cursor() {
        let mut app = test_app();
        app.add_persona(persona("OLD"));
        app.add_persona(persona("NEW"));
        app.roster_dirty = false;
        app.roster_next();

        app.delete_selected();
        assert_eq!(app.personas.len(), 1);
        assert_eq!(app.personas[0].name, "NEW");
        assert_eq!(app.roster_index, 0);
        assert!(app.roster_dirty);

        app.delete_selected();
        assert!(app.personas.is_empty());

        // Empty roster is a no-op.
        app.delete_selected();
        assert_eq!(app.roster_index, 0);
    }

    #[test]
    fn test_unicode_input_editing() {
        let mut app = test_app();
        app.set_input("héllo");
        assert_eq!(app.cursor_position(), 5);

        app.backspace();
        assert_eq!(app.input_buffer(), "héll");
        app.cursor_home();
        app.delete();
        assert_eq!(app.input_buffer(), "éll");
    }

    #[test]
    fn test_quit_command() {
        let mut app = test_app();
        app.process_command(":q");
        assert!(app.should_quit);
    }

    #[test]
    fn test_deploy_tab_queues_snippet_once() {
        let mut app = test_app();
        app.add_persona(persona("VESSEL"));
        app.open_selected();

        app.toggle_session_tab();
        assert!(app.pending_snippet);
        assert_eq!(app.session.as_ref().unwrap().tab(), SessionTab::Deploy);

        // Snippet generation is not re-queued once recorded.
        app.pending_snippet = false;
        if let Some(session) = app.session.as_mut() {
            session.record_snippet_result(Ok("<Embed />".to_string()));
        }
        app.toggle_session_tab();
        app.toggle_session_tab();
        assert!(!app.pending_snippet);
    }
}
