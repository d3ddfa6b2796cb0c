//! Persona builder for the creator wizard.
//!
//! The wizard fills a draft incrementally across its three steps; validation
//! happens only at finalization, which is a pure function from the draft plus
//! generated id/timestamp/api-key to a complete `Persona`.

use crate::persona::{BrainType, CharacterProfile, Persona};
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Length of a generated persona id.
const ID_LEN: usize = 9;

/// Length of the random portion of a generated API key.
const API_KEY_LEN: usize = 16;

/// Error from persona finalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Persona name is required")]
    MissingName,

    #[error("Functional role is required")]
    MissingRole,
}

/// Builder for creating personas.
#[derive(Debug, Clone, Default)]
pub struct PersonaBuilder {
    name: Option<String>,
    role: Option<String>,
    character: CharacterProfile,
    description: String,
    brain_type: BrainType,
}

impl PersonaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn character(mut self, character: CharacterProfile) -> Self {
        self.character = character;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn brain_type(mut self, brain_type: BrainType) -> Self {
        self.brain_type = brain_type;
        self
    }

    /// Finalize the draft into a complete persona.
    ///
    /// A finalized persona always starts with an empty knowledge base: the
    /// platform's whole premise is that vessels know nothing until taught.
    pub fn build(self) -> Result<Persona, BuildError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(BuildError::MissingName)?;
        let role = self
            .role
            .filter(|r| !r.trim().is_empty())
            .ok_or(BuildError::MissingRole)?;

        Ok(Persona {
            id: random_token(ID_LEN),
            name,
            role,
            character: self.character,
            description: self.description,
            knowledge_base: Vec::new(),
            brain_type: self.brain_type,
            created_at: now_millis(),
            api_key: generate_api_key(),
        })
    }
}

/// Generate a random lowercase base36 token.
pub fn random_token(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generate an embed API key in the platform's `sk_faces_` format.
pub fn generate_api_key() -> String {
    format!("sk_faces_{}", random_token(API_KEY_LEN))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let persona = PersonaBuilder::new()
            .name("X")
            .role("Y")
            .build()
            .expect("build should succeed");

        assert_eq!(persona.name, "X");
        assert_eq!(persona.role, "Y");
        assert!(persona.knowledge_base.is_empty());
        assert_eq!(persona.brain_type, BrainType::Standard);
        assert_eq!(persona.character, CharacterProfile::Professional);
        assert!(persona.description.is_empty());
    }

    #[test]
    fn test_build_requires_name_and_role() {
        assert_eq!(
            PersonaBuilder::new().role("Y").build().unwrap_err(),
            BuildError::MissingName
        );
        assert_eq!(
            PersonaBuilder::new().name("X").build().unwrap_err(),
            BuildError::MissingRole
        );
        // Whitespace-only fields don't pass the gate either.
        assert_eq!(
            PersonaBuilder::new().name("  ").role("Y").build().unwrap_err(),
            BuildError::MissingName
        );
    }

    #[test]
    fn test_generated_tokens() {
        let persona = PersonaBuilder::new()
            .name("X")
            .role("Y")
            .build()
            .unwrap();

        assert_eq!(persona.id.len(), 9);
        assert!(persona.id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(persona.api_key.starts_with("sk_faces_"));
        assert_eq!(persona.api_key.len(), "sk_faces_".len() + 16);
        assert!(persona.created_at > 0);
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = PersonaBuilder::new().name("A").role("R").build().unwrap();
        let b = PersonaBuilder::new().name("B").role("R").build().unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.api_key, b.api_key);
    }

    #[test]
    fn test_build_with_all_fields() {
        let persona = PersonaBuilder::new()
            .name("ARCHIVE-ALPHA")
            .role("Regional Law Expert")
            .character(CharacterProfile::Stoic)
            .description("Keeper of regional statutes")
            .brain_type(BrainType::HighPerformance)
            .build()
            .unwrap();

        assert_eq!(persona.character, CharacterProfile::Stoic);
        assert_eq!(persona.brain_type, BrainType::HighPerformance);
        assert_eq!(persona.description, "Keeper of regional statutes");
    }
}
