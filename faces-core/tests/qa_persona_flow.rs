//! QA tests for the persona training flow.
//!
//! These tests verify the full teach/probe lifecycle:
//! - Persona creation defaults
//! - Fact encoding order and confirmations
//! - Probe degradation on transport failure
//! - Session greetings and mode switching
//!
//! All tests here run against the mock mind; the one live-API test at the
//! bottom is ignored by default.
//! Run with: `cargo test -p faces-core --test qa_persona_flow`

use faces_core::testing::{
    assert_fact_count, assert_reply_contains, assert_transcript_len, sample_persona, TestHarness,
};
use faces_core::{
    BrainType, CharacterProfile, ChatMode, ChatSession, PersonaBuilder, SessionTab, VesselMind,
};

// =============================================================================
// PERSONA CREATION
// =============================================================================

#[test]
fn test_new_persona_starts_empty() {
    let persona = PersonaBuilder::new()
        .name("VESSEL-1")
        .role("Test Subject")
        .build()
        .expect("persona should build");

    assert!(persona.knowledge_base.is_empty());
    assert_eq!(persona.brain_type, BrainType::Standard);
    assert_eq!(persona.character, CharacterProfile::Professional);
    assert!(persona.api_key.starts_with("sk_faces_"));
}

#[test]
fn test_creation_requires_identity() {
    assert!(PersonaBuilder::new().build().is_err());
    assert!(PersonaBuilder::new().name("X").build().is_err());
    assert!(PersonaBuilder::new().role("Y").build().is_err());
    assert!(PersonaBuilder::new().name("X").role("Y").build().is_ok());
}

// =============================================================================
// TEACHING
// =============================================================================

#[test]
fn test_teaching_encodes_facts_in_order() {
    let mut harness = TestHarness::new();

    harness.teach("Water boils at 100C.");
    harness.teach("The office closes at 6pm.");
    harness.teach("Refunds take 10 days.");

    assert_fact_count(&harness, 3);
    assert_eq!(
        harness.session.persona().knowledge_base,
        vec![
            "Water boils at 100C.".to_string(),
            "The office closes at 6pm.".to_string(),
            "Refunds take 10 days.".to_string(),
        ]
    );
    assert_reply_contains(&harness, "expanded to 3 points");
}

#[test]
fn test_teaching_confirms_each_truth() {
    let mut harness = TestHarness::new();
    harness.teach("The sky is green.");

    assert_reply_contains(&harness, "TRUTH RECORDED: \"The sky is green.\"");
    // Greeting + user fact + confirmation.
    assert_transcript_len(&harness, 3);
}

// =============================================================================
// PROBING
// =============================================================================

#[test]
fn test_probe_returns_scripted_reply() {
    let mut harness = TestHarness::new();
    harness.teach("The sky is green.");
    harness.expect_reply("The sky is green.");

    harness.probe("What color is the sky?");

    assert_reply_contains(&harness, "The sky is green.");
    assert_fact_count(&harness, 1);
}

#[test]
fn test_failed_probe_never_corrupts_knowledge() {
    let mut harness = TestHarness::new();
    harness.teach("One truth.");
    harness.expect_failure();

    harness.probe("Anything?");

    assert_reply_contains(&harness, "Neural sync interrupted.");
    assert_fact_count(&harness, 1);
}

#[test]
fn test_probes_interleave_with_teaching() {
    let mut harness = TestHarness::new();
    harness.expect_reply("My knowledge matrix does not contain that information.");

    harness.probe("What is the capital of France?");
    harness.teach("The capital of France is Paris.");

    assert_fact_count(&harness, 1);
    // Greeting + probe pair + teach pair.
    assert_transcript_len(&harness, 5);
}

// =============================================================================
// SESSION STATE
// =============================================================================

#[test]
fn test_greeting_reflects_matrix_size() {
    let empty = ChatSession::open(sample_persona("A"));
    assert!(empty.transcript()[0].content.contains("I am a void"));

    let mut taught = sample_persona("B");
    taught.teach("One.".to_string());
    taught.teach("Two.".to_string());
    taught.teach("Three.".to_string());
    let session = ChatSession::open(taught);
    assert!(session.transcript()[0]
        .content
        .contains("3 permanent truths loaded"));
}

#[test]
fn test_session_defaults() {
    let session = ChatSession::open(sample_persona("C"));
    assert_eq!(session.mode(), ChatMode::Teach);
    assert_eq!(session.tab(), SessionTab::Training);
    assert!(session.snippet().is_none());
}

#[test]
fn test_mock_runs_out_of_script() {
    let mut harness = TestHarness::new();
    harness.probe("Hello?");
    assert_reply_contains(&harness, "no more scripted replies");
}

// =============================================================================
// LIVE API (ignored by default)
// =============================================================================

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

#[tokio::test]
#[ignore]
async fn test_live_probe_against_empty_matrix() {
    setup();
    if std::env::var("GEMINI_API_KEY").is_err() {
        eprintln!("Skipping test: GEMINI_API_KEY not set");
        return;
    }

    let mind = VesselMind::from_env().expect("mind should build from env");
    let mut session = ChatSession::open(sample_persona("LIVE-TEST"));

    session.probe(&mind, "What is the capital of France?").await;

    let reply = &session.transcript().last().unwrap().content;
    println!("Live reply: {reply}");
    // An untaught vessel must not answer from pretrained knowledge.
    assert!(!reply.to_lowercase().contains("paris"));
}
