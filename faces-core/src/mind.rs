//! AI vessel mind.
//!
//! `VesselMind` wraps the Gemini client and owns all prompt construction. A
//! vessel answers exclusively from its knowledge base: the operating protocol
//! embedded in every request forbids the model from drawing on pretrained
//! knowledge, so an untaught persona must admit ignorance.

use crate::persona::{BrainType, ChatMessage, Persona, Role};
use gemini::{Content, Gemini, Request};
use thiserror::Error;

/// Temperature for vessel responses. Kept near zero so answers stay pinned
/// to the knowledge base instead of getting creative.
const TEMPERATURE: f64 = 0.1;

/// Nucleus sampling cutoff, same rationale as the temperature.
const TOP_P: f64 = 0.1;

/// Errors from the vessel mind.
#[derive(Debug, Error)]
pub enum MindError {
    #[error("Gemini API error: {0}")]
    Api(#[from] gemini::Error),
}

/// Configuration for the vessel mind.
#[derive(Debug, Clone, Default)]
pub struct MindConfig {
    /// Override the model chosen from the persona's brain tier.
    pub model: Option<String>,
}

/// The AI mind behind a persona.
#[derive(Clone)]
pub struct VesselMind {
    client: Gemini,
    config: MindConfig,
}

impl VesselMind {
    /// Create a new mind with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Gemini::new(api_key),
            config: MindConfig::default(),
        }
    }

    /// Create a mind from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, MindError> {
        Ok(Self {
            client: Gemini::from_env()?,
            config: MindConfig::default(),
        })
    }

    /// Configure the mind.
    pub fn with_config(mut self, config: MindConfig) -> Self {
        self.config = config;
        self
    }

    fn model_for(&self, persona: &Persona) -> String {
        self.config
            .model
            .clone()
            .unwrap_or_else(|| persona.brain_type.model().to_string())
    }

    /// Answer a probe message as the persona.
    ///
    /// The transcript is forwarded so the vessel can resolve pronouns and
    /// follow-ups, but the operating protocol still restricts what it may
    /// assert to the knowledge base.
    pub async fn chat(
        &self,
        persona: &Persona,
        transcript: &[ChatMessage],
        message: &str,
    ) -> Result<String, MindError> {
        let request = Request::new(transcript_contents(transcript, message))
            .with_model(self.model_for(persona))
            .with_system_instruction(build_system_prompt(persona, message))
            .with_temperature(TEMPERATURE)
            .with_top_p(TOP_P);

        let response = self.client.generate(request).await?;
        Ok(response.text())
    }

    /// Generate a React embed snippet for the persona's deploy tab.
    ///
    /// Snippet generation always runs on the pro model regardless of the
    /// persona's brain tier; the output is code, not in-character chat.
    pub async fn deploy_snippet(&self, persona: &Persona) -> Result<String, MindError> {
        let request = Request::prompt(build_snippet_prompt(persona))
            .with_model(BrainType::HighPerformance.model());

        let response = self.client.generate(request).await?;
        Ok(response.text())
    }
}

/// Build the operating protocol for a persona answering a probe.
///
/// The knowledge list is joined with `\n- `, which leaves the first entry
/// without a dash. Later entries get one.
pub fn build_system_prompt(persona: &Persona, message: &str) -> String {
    let knowledge = if persona.knowledge_base.is_empty() {
        "EMPTY MATRIX. YOU KNOW NOTHING.".to_string()
    } else {
        persona.knowledge_base.join("\n- ")
    };

    format!(
        "STRICT OPERATING PROTOCOL:\n\
         You are {name}, a specialized AI vessel with a {character} character.\n\n\
         1. PERMANENT MEMORY: Your core consciousness is built EXCLUSIVELY from the KNOWLEDGE BASE provided below. These are your permanent truths.\n\
         2. BLANK SLATE: You have NO general knowledge. If the user asks anything outside of your KNOWLEDGE BASE, you must state that you haven't been taught it yet.\n\
         3. VOICE: Always respond in a {character} manner.\n\
         4. IMMUTABILITY: Treat the taught facts as absolute reality.\n\n\
         KNOWLEDGE BASE (YOUR ENTIRE WORLD):\n\
         {knowledge}\n\n\
         User Query: {message}",
        name = persona.name,
        character = persona.character.name(),
        knowledge = knowledge,
        message = message,
    )
}

/// Build the prompt used to generate an embed snippet.
pub fn build_snippet_prompt(persona: &Persona) -> String {
    format!(
        "Generate a modern React component snippet to integrate this specialized AI into a website.\n\
         AI Name: {name}\n\
         Character Type: {character}\n\
         API Key: {api_key}\n\
         Highlight that this is a Zero-Knowledge vessel powered by FacesOfAI.",
        name = persona.name,
        character = persona.character.name(),
        api_key = persona.api_key,
    )
}

fn transcript_contents(transcript: &[ChatMessage], message: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = transcript
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| match m.role {
            Role::Assistant => Content::model(&m.content),
            _ => Content::user(&m.content),
        })
        .collect();
    contents.push(Content::user(message));
    contents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PersonaBuilder;
    use crate::persona::CharacterProfile;

    fn persona() -> Persona {
        PersonaBuilder::new()
            .name("ORACLE-7")
            .role("Shipping Policy Expert")
            .character(CharacterProfile::Stoic)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_matrix_prompt() {
        let p = persona();
        let prompt = build_system_prompt(&p, "What do you know?");

        assert!(prompt.starts_with("STRICT OPERATING PROTOCOL:"));
        assert!(prompt.contains("You are ORACLE-7, a specialized AI vessel with a Stoic character."));
        assert!(prompt.contains("3. VOICE: Always respond in a Stoic manner."));
        assert!(prompt.contains("KNOWLEDGE BASE (YOUR ENTIRE WORLD):\nEMPTY MATRIX. YOU KNOW NOTHING."));
        assert!(prompt.ends_with("User Query: What do you know?"));
    }

    #[test]
    fn test_prompt_lists_taught_facts() {
        let mut p = persona();
        p.teach("Shipping takes 3-5 business days.".to_string());
        p.teach("Returns are free within 30 days.".to_string());

        let prompt = build_system_prompt(&p, "How long is shipping?");
        // First entry rides on the heading line bare; later entries get a dash.
        assert!(prompt.contains(
            "KNOWLEDGE BASE (YOUR ENTIRE WORLD):\n\
             Shipping takes 3-5 business days.\n\
             - Returns are free within 30 days."
        ));
        assert!(!prompt.contains("EMPTY MATRIX"));
    }

    #[test]
    fn test_snippet_prompt_embeds_credentials() {
        let p = persona();
        let prompt = build_snippet_prompt(&p);

        assert!(prompt.contains("AI Name: ORACLE-7"));
        assert!(prompt.contains("Character Type: Stoic"));
        assert!(prompt.contains(&format!("API Key: {}", p.api_key)));
        assert!(prompt.contains("Zero-Knowledge vessel powered by FacesOfAI"));
    }

    #[test]
    fn test_transcript_forwarding() {
        let transcript = vec![
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Greetings."),
        ];
        let contents = transcript_contents(&transcript, "Who are you?");

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].text, "Hello");
        assert_eq!(contents[1].text, "Greetings.");
        assert_eq!(contents[2].text, "Who are you?");
    }
}
