//! ChatSession - the training interface for a single persona.
//!
//! A session owns the persona being trained plus the live transcript. It has
//! two modes: TEACH appends a fact to the knowledge base without any network
//! call, PROBE asks the vessel mind to answer from what it has been taught.
//! The deploy tab lazily generates an embed snippet, at most once per
//! session.

use crate::mind::{MindError, VesselMind};
use crate::persona::{ChatMessage, Persona};
use serde::{Deserialize, Serialize};

/// Reply shown when a probe fails at the transport level.
pub const SYNC_INTERRUPTED: &str = "Neural sync interrupted.";

/// Placeholder shown when snippet generation fails or comes back empty.
pub const SNIPPET_FALLBACK: &str = "// Error generating snippet";

/// Input mode for the training chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Encode the input as a permanent fact.
    #[default]
    Teach,
    /// Ask the vessel to answer from its knowledge base.
    Probe,
}

impl ChatMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Teach => Self::Probe,
            Self::Probe => Self::Teach,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Teach => "TEACH",
            Self::Probe => "PROBE",
        }
    }
}

/// Which pane of the session is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionTab {
    #[default]
    Training,
    Deploy,
}

/// A live training session for one persona.
pub struct ChatSession {
    persona: Persona,
    transcript: Vec<ChatMessage>,
    mode: ChatMode,
    tab: SessionTab,
    snippet: Option<String>,
}

impl ChatSession {
    /// Open a session on a persona, seeding the transcript with a greeting
    /// that reflects how much the vessel currently knows.
    pub fn open(persona: Persona) -> Self {
        let greeting = if persona.fact_count() == 0 {
            "Neural Matrix finalized. I am a void. Use TEACH mode to encode my first permanent memory."
                .to_string()
        } else {
            format!(
                "Sync complete. {} permanent truths loaded into active memory.",
                persona.fact_count()
            )
        };

        Self {
            persona,
            transcript: vec![ChatMessage::assistant(greeting)],
            mode: ChatMode::default(),
            tab: SessionTab::default(),
            snippet: None,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Close the session, returning the persona with any taught facts.
    pub fn into_persona(self) -> Persona {
        self.persona
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ChatMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn tab(&self) -> SessionTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: SessionTab) {
        self.tab = tab;
    }

    /// Encode a fact into the persona's knowledge base.
    ///
    /// Purely local: the message and the confirmation land in the transcript
    /// without touching the network.
    pub fn teach(&mut self, fact: impl Into<String>) {
        let fact = fact.into();
        self.transcript.push(ChatMessage::user(&fact));
        self.persona.teach(fact.clone());
        self.transcript.push(ChatMessage::assistant(format!(
            "TRUTH RECORDED: \"{}\". This is now a permanent part of my neural matrix. \
             My consciousness has expanded to {} points.",
            fact,
            self.persona.fact_count()
        )));
    }

    /// Record the user side of a probe before the mind is consulted.
    pub fn begin_probe(&mut self, message: impl Into<String>) -> String {
        let message = message.into();
        self.transcript.push(ChatMessage::user(&message));
        message
    }

    /// Record the outcome of a probe.
    ///
    /// A failed probe degrades to a canned interruption message; it never
    /// touches the knowledge base.
    pub fn record_probe_result(&mut self, result: Result<String, MindError>) {
        let reply = match result {
            Ok(text) => text,
            Err(e) => {
                log::warn!("probe failed: {e}");
                SYNC_INTERRUPTED.to_string()
            }
        };
        self.transcript.push(ChatMessage::assistant(reply));
    }

    /// Ask the vessel to answer a probe from its knowledge base.
    pub async fn probe(&mut self, mind: &VesselMind, message: impl Into<String>) {
        let message = self.begin_probe(message);
        // Transcript minus the probe we just recorded, so it isn't sent twice.
        let history = &self.transcript[..self.transcript.len() - 1];
        let result = mind.chat(&self.persona, history, &message).await;
        self.record_probe_result(result);
    }

    /// The embed snippet, if one has been generated this session.
    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    /// Record the outcome of snippet generation.
    ///
    /// Errors and empty responses both collapse to the placeholder, which
    /// still counts as generated: the session will not retry.
    pub fn record_snippet_result(&mut self, result: Result<String, MindError>) {
        let snippet = match result {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => SNIPPET_FALLBACK.to_string(),
            Err(e) => {
                log::warn!("snippet generation failed: {e}");
                SNIPPET_FALLBACK.to_string()
            }
        };
        self.snippet = Some(snippet);
    }

    /// Generate the embed snippet if it has not been generated yet.
    pub async fn ensure_snippet(&mut self, mind: &VesselMind) {
        if self.snippet.is_some() {
            return;
        }
        let result = mind.deploy_snippet(&self.persona).await;
        self.record_snippet_result(result);
    }
}
