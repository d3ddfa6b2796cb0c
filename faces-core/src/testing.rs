//! Testing utilities for persona training flows.
//!
//! This module provides tools for integration testing:
//! - `MockMind` for deterministic probes without API calls
//! - `TestHarness` for scripted training scenarios
//! - Assertion helpers for verifying session state

use crate::builder::PersonaBuilder;
use crate::mind::MindError;
use crate::persona::{Persona, Role};
use crate::session::ChatSession;

/// A mock vessel mind that returns scripted probe replies.
///
/// Use this for deterministic integration tests without API calls.
pub struct MockMind {
    /// Scripted probe outcomes to return in order.
    replies: Vec<Result<String, MindError>>,
    /// Index of next reply to return.
    reply_index: usize,
}

impl MockMind {
    /// Create a new mock mind with scripted replies.
    pub fn new(replies: Vec<Result<String, MindError>>) -> Self {
        Self {
            replies,
            reply_index: 0,
        }
    }

    /// Queue a successful probe reply.
    pub fn queue_reply(&mut self, text: impl Into<String>) {
        self.replies.push(Ok(text.into()));
    }

    /// Queue a failed probe.
    pub fn queue_failure(&mut self) {
        self.replies.push(Err(MindError::Api(gemini::Error::Network(
            "scripted failure".to_string(),
        ))));
    }

    /// Return the next scripted outcome.
    pub fn next_reply(&mut self) -> Result<String, MindError> {
        if self.reply_index < self.replies.len() {
            let reply = clone_outcome(&self.replies[self.reply_index]);
            self.reply_index += 1;
            reply
        } else {
            Ok("The mock mind has no more scripted replies.".to_string())
        }
    }

    /// Reset the reply index to replay from the beginning.
    pub fn reset(&mut self) {
        self.reply_index = 0;
    }
}

fn clone_outcome(outcome: &Result<String, MindError>) -> Result<String, MindError> {
    match outcome {
        Ok(text) => Ok(text.clone()),
        Err(MindError::Api(e)) => Err(MindError::Api(gemini::Error::Network(e.to_string()))),
    }
}

/// Test harness for running training scenarios.
pub struct TestHarness {
    /// The mock mind.
    pub mind: MockMind,
    /// The live session.
    pub session: ChatSession,
}

impl TestHarness {
    /// Create a new harness around a fresh, untaught persona.
    pub fn new() -> Self {
        let persona = sample_persona("Test Vessel");
        Self::with_persona(persona)
    }

    /// Create a harness around a custom persona.
    pub fn with_persona(persona: Persona) -> Self {
        Self {
            mind: MockMind::new(Vec::new()),
            session: ChatSession::open(persona),
        }
    }

    /// Queue a probe reply.
    pub fn expect_reply(&mut self, text: impl Into<String>) -> &mut Self {
        self.mind.queue_reply(text);
        self
    }

    /// Queue a probe failure.
    pub fn expect_failure(&mut self) -> &mut Self {
        self.mind.queue_failure();
        self
    }

    /// Teach a fact through the session.
    pub fn teach(&mut self, fact: &str) {
        self.session.teach(fact);
    }

    /// Probe the mock mind through the session.
    pub fn probe(&mut self, message: &str) {
        self.session.begin_probe(message);
        let reply = self.mind.next_reply();
        self.session.record_probe_result(reply);
    }

    /// Number of facts currently encoded.
    pub fn fact_count(&self) -> usize {
        self.session.persona().fact_count()
    }

    /// The last assistant message in the transcript, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.session
            .transcript()
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a fresh, untaught persona for tests.
pub fn sample_persona(name: &str) -> Persona {
    PersonaBuilder::new()
        .name(name)
        .role("Integration Test Subject")
        .build()
        .unwrap_or_else(|e| panic!("sample persona should build: {e}"))
}

/// Assert the persona has encoded exactly this many facts.
#[track_caller]
pub fn assert_fact_count(harness: &TestHarness, expected: usize) {
    let actual = harness.fact_count();
    assert_eq!(
        actual, expected,
        "expected {expected} encoded facts, found {actual}"
    );
}

/// Assert the last assistant reply contains the given text.
#[track_caller]
pub fn assert_reply_contains(harness: &TestHarness, needle: &str) {
    let reply = harness
        .last_reply()
        .unwrap_or_else(|| panic!("no assistant reply in transcript"));
    assert!(
        reply.contains(needle),
        "expected reply containing {needle:?}, got {reply:?}"
    );
}

/// Assert the transcript has exactly this many messages.
#[track_caller]
pub fn assert_transcript_len(harness: &TestHarness, expected: usize) {
    let actual = harness.session.transcript().len();
    assert_eq!(
        actual, expected,
        "expected {expected} transcript messages, found {actual}"
    );
}
