//! QA tests for user and persona persistence.
//!
//! These tests verify that state survives a restart and that corrupt files
//! degrade the way the app expects: a broken roster is recoverable, a broken
//! user record is not.
//! Run with: `cargo test -p faces-core --test qa_persistence`

use faces_core::{ChatSession, PersonaBuilder, ProfileStore, StoreError, User};
use tempfile::TempDir;

fn store() -> (TempDir, ProfileStore) {
    let dir = TempDir::new().expect("temp dir should create");
    let store = ProfileStore::new(dir.path());
    (dir, store)
}

// =============================================================================
// TEST 1: Full lifecycle across a simulated restart
// =============================================================================

#[tokio::test]
async fn test_training_survives_restart() {
    let (_dir, store) = store();

    let persona = PersonaBuilder::new()
        .name("ARCHIVE-ALPHA")
        .role("Legal Expert")
        .build()
        .expect("persona should build");
    let id = persona.id.clone();

    let mut session = ChatSession::open(persona);
    session.teach("The statute of limitations is seven years.");
    session.teach("Appeals must be filed within 30 days.");

    store
        .save_personas(&[session.into_persona()])
        .await
        .expect("save should succeed");

    // Simulate a restart with a fresh store over the same directory.
    let reopened = ProfileStore::new(_dir.path());
    let roster = reopened.load_personas().await.expect("load should succeed");

    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, id);
    assert_eq!(roster[0].fact_count(), 2);

    let session = ChatSession::open(roster[0].clone());
    assert!(session.transcript()[0]
        .content
        .contains("2 permanent truths loaded"));
}

// =============================================================================
// TEST 2: Roster ordering
// =============================================================================

#[tokio::test]
async fn test_newest_persona_saved_first() {
    let (_dir, store) = store();

    let older = PersonaBuilder::new().name("OLD").role("R").build().unwrap();
    let newer = PersonaBuilder::new().name("NEW").role("R").build().unwrap();

    // New personas go to the front of the roster.
    let mut roster = vec![older];
    roster.insert(0, newer);
    store.save_personas(&roster).await.unwrap();

    let loaded = store.load_personas().await.unwrap();
    assert_eq!(loaded[0].name, "NEW");
    assert_eq!(loaded[1].name, "OLD");
}

// =============================================================================
// TEST 3: Corruption handling
// =============================================================================

#[tokio::test]
async fn test_corrupt_roster_is_recoverable() {
    let (_dir, store) = store();

    tokio::fs::write(store.personas_path(), "[{\"id\": truncated")
        .await
        .unwrap();

    let roster = store.load_personas().await.expect("load should not fail");
    assert!(roster.is_empty());

    // The store must still accept new saves over the corrupt file.
    let persona = PersonaBuilder::new().name("A").role("R").build().unwrap();
    store.save_personas(&[persona]).await.unwrap();
    assert_eq!(store.load_personas().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_user_record_propagates() {
    let (_dir, store) = store();

    tokio::fs::write(store.user_path(), "{\"name\": 42}")
        .await
        .unwrap();

    assert!(matches!(store.load_user().await, Err(StoreError::Json(_))));
}

// =============================================================================
// TEST 4: Sign-in and sign-out
// =============================================================================

#[tokio::test]
async fn test_sign_out_clears_user_but_keeps_personas() {
    let (_dir, store) = store();

    let user = User {
        name: "Neural Architect".to_string(),
        email: "architect@faces.ai".to_string(),
    };
    store.save_user(&user).await.unwrap();

    let persona = PersonaBuilder::new().name("A").role("R").build().unwrap();
    store.save_personas(&[persona]).await.unwrap();

    store.clear_user().await.unwrap();

    assert!(store.load_user().await.unwrap().is_none());
    assert_eq!(store.load_personas().await.unwrap().len(), 1);
}
