//! Persona domain model.
//!
//! A persona is a user-defined character profile paired with an append-only
//! list of taught facts. The knowledge base is the persona's entire semantic
//! memory; nothing else feeds the AI's context.

use serde::{Deserialize, Serialize};

/// The account holder. Created at login, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// Which external model class handles a persona's queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrainType {
    #[default]
    Standard,
    HighPerformance,
}

impl BrainType {
    /// The Gemini model identifier backing this tier.
    pub fn model(&self) -> &'static str {
        match self {
            BrainType::Standard => "gemini-3-flash-preview",
            BrainType::HighPerformance => "gemini-3-pro-preview",
        }
    }

    /// Display label shown in the creator wizard.
    pub fn label(&self) -> &'static str {
        match self {
            BrainType::Standard => "Fact Memory Module",
            BrainType::HighPerformance => "Reasoning Synapse Cluster",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BrainType::Standard => {
                "Optimized for quick learning and effortless recall of taught information."
            }
            BrainType::HighPerformance => {
                "Enables deeper understanding by linking ideas and uncovering complex relationships."
            }
        }
    }

    pub fn all() -> &'static [BrainType] {
        &[BrainType::Standard, BrainType::HighPerformance]
    }
}

/// Fixed set of character labels a persona can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterProfile {
    #[default]
    Professional,
    Friendly,
    Academic,
    Witty,
    Stoic,
}

impl CharacterProfile {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterProfile::Professional => "Professional",
            CharacterProfile::Friendly => "Friendly",
            CharacterProfile::Academic => "Academic",
            CharacterProfile::Witty => "Witty",
            CharacterProfile::Stoic => "Stoic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CharacterProfile::Professional => "Concise, detached, and highly accurate.",
            CharacterProfile::Friendly => "Warm, encouraging, and helpful tone.",
            CharacterProfile::Academic => "Detailed, formal, and structured responses.",
            CharacterProfile::Witty => "Slightly sarcastic, sharp, and engaging.",
            CharacterProfile::Stoic => "Minimalist, direct, and serious.",
        }
    }

    pub fn all() -> &'static [CharacterProfile] {
        &[
            CharacterProfile::Professional,
            CharacterProfile::Friendly,
            CharacterProfile::Academic,
            CharacterProfile::Witty,
            CharacterProfile::Stoic,
        ]
    }
}

impl std::fmt::Display for CharacterProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A user-defined AI persona.
///
/// `knowledge_base` is append-only and chronological: teach mode pushes to the
/// end, and no edit or delete path exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Random token identifying this persona.
    pub id: String,

    pub name: String,
    pub role: String,
    pub character: CharacterProfile,
    pub description: String,

    /// Taught facts, in teaching order. The persona's entire memory.
    pub knowledge_base: Vec<String>,

    pub brain_type: BrainType,

    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,

    /// Generated embed key surfaced on the deploy tab.
    pub api_key: String,
}

impl Persona {
    /// Append a taught fact to the permanent knowledge base.
    pub fn teach(&mut self, fact: impl Into<String>) {
        self.knowledge_base.push(fact.into());
    }

    /// Number of taught facts.
    pub fn fact_count(&self) -> usize {
        self.knowledge_base.len()
    }
}

/// The sender of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One entry in an active session's transcript.
///
/// Transcripts are transient: they live only in the open session and are lost
/// on navigation away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brain_type_models() {
        assert_eq!(BrainType::Standard.model(), "gemini-3-flash-preview");
        assert_eq!(BrainType::HighPerformance.model(), "gemini-3-pro-preview");
    }

    #[test]
    fn test_brain_type_default() {
        assert_eq!(BrainType::default(), BrainType::Standard);
    }

    #[test]
    fn test_character_profiles_complete() {
        let names: Vec<&str> = CharacterProfile::all().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["Professional", "Friendly", "Academic", "Witty", "Stoic"]
        );
    }

    #[test]
    fn test_teach_appends_in_order() {
        let mut persona = crate::PersonaBuilder::new()
            .name("Test")
            .role("Tester")
            .build()
            .unwrap();

        persona.teach("first");
        persona.teach("second");

        assert_eq!(persona.knowledge_base, vec!["first", "second"]);
        assert_eq!(persona.fact_count(), 2);
    }

    #[test]
    fn test_persona_serde_field_names() {
        let persona = crate::PersonaBuilder::new()
            .name("A")
            .role("B")
            .build()
            .unwrap();

        let json = serde_json::to_value(&persona).unwrap();
        // Saved profiles use camelCase keys.
        assert!(json.get("knowledgeBase").is_some());
        assert!(json.get("brainType").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["brainType"], "standard");
    }

    #[test]
    fn test_chat_message_constructors() {
        let msg = ChatMessage::user("hello");
        assert_eq!(msg.role, Role::User);

        let msg = ChatMessage::assistant("hi");
        assert_eq!(msg.role, Role::Assistant);
    }
}
