//! FacesOfAI persona engine.
//!
//! This crate provides:
//! - The persona domain model (append-only knowledge bases, brain tiers)
//! - A builder for finalizing persona drafts from the creator wizard
//! - JSON profile persistence for the logged-in user and the persona roster
//! - The Gemini-backed "vessel mind" that answers probes from taught facts
//!
//! # Quick Start
//!
//! ```ignore
//! use faces_core::{ChatSession, PersonaBuilder, VesselMind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let persona = PersonaBuilder::new()
//!         .name("ARCHIVE-ALPHA")
//!         .role("Regional Law Expert")
//!         .build()?;
//!
//!     let mut session = ChatSession::open(persona);
//!     session.teach("The statute of limitations is two years.");
//!
//!     let mind = VesselMind::from_env()?;
//!     session.probe(&mind, "How long do I have to file?").await;
//!     if let Some(reply) = session.transcript().last() {
//!         println!("{}", reply.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod mind;
pub mod persona;
pub mod session;
pub mod store;
pub mod testing;

// Primary public API
pub use builder::{BuildError, PersonaBuilder};
pub use mind::{MindConfig, MindError, VesselMind};
pub use persona::{BrainType, CharacterProfile, ChatMessage, Persona, Role, User};
pub use session::{ChatMode, ChatSession, SessionTab};
pub use store::{ProfileStore, StoreError};
pub use testing::{MockMind, TestHarness};
