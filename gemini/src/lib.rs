//! Minimal Google Gemini API client.
//!
//! This crate provides a focused client for the `generateContent` endpoint:
//! - System instructions, conversation contents, and generation config
//! - Typed errors for network, API, and parse failures
//!
//! No retries, no backoff: a request either succeeds or returns an error.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Errors that can occur when using the Gemini client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Gemini API client.
#[derive(Clone)]
pub struct Gemini {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl Gemini {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create a Gemini client from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| Error::NoApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Set the default model for this client.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send a generation request and return the full response.
    pub async fn generate(&self, request: Request) -> Result<Response, Error> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        let api_request = build_api_request(&request);
        let headers = self.build_headers()?;

        let response = self
            .client
            .post(format!("{API_BASE}/models/{model}:generateContent"))
            .headers(headers)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        Ok(parse_response(api_response))
    }

    fn build_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| Error::Config(format!("Invalid API key: {e}")))?,
        );
        Ok(headers)
    }
}

// ============================================================================
// Public types
// ============================================================================

/// A generation request to send to Gemini.
#[derive(Debug, Clone)]
pub struct Request {
    pub model: Option<String>,
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

impl Request {
    /// Create a new request with the given conversation contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            model: None,
            system_instruction: None,
            contents,
            temperature: None,
            top_p: None,
        }
    }

    /// Create a request carrying a single user prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(vec![Content::user(text)])
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }
}

/// A single turn of the conversation.
#[derive(Debug, Clone)]
pub struct Content {
    pub role: Role,
    pub text: String,
}

impl Content {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// The role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// A generation response from Gemini.
#[derive(Debug, Clone)]
pub struct Response {
    pub candidates: Vec<Candidate>,
}

impl Response {
    /// Get all text parts of the first candidate concatenated.
    ///
    /// Returns an empty string when the model produced no candidates.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| c.parts.join(""))
            .unwrap_or_default()
    }
}

/// A single candidate completion.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub parts: Vec<String>,
    pub finish_reason: Option<String>,
}

// ============================================================================
// Internal API types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ApiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    content: Option<ApiContent>,
    finish_reason: Option<String>,
}

fn build_api_request(request: &Request) -> ApiRequest {
    let contents: Vec<ApiContent> = request
        .contents
        .iter()
        .map(|c| ApiContent {
            role: Some(
                match c.role {
                    Role::User => "user",
                    Role::Model => "model",
                }
                .to_string(),
            ),
            parts: vec![ApiPart {
                text: c.text.clone(),
            }],
        })
        .collect();

    let generation_config = if request.temperature.is_some() || request.top_p.is_some() {
        Some(ApiGenerationConfig {
            temperature: request.temperature,
            top_p: request.top_p,
        })
    } else {
        None
    };

    ApiRequest {
        system_instruction: request.system_instruction.as_ref().map(|text| ApiContent {
            role: None,
            parts: vec![ApiPart { text: text.clone() }],
        }),
        contents,
        generation_config,
    }
}

fn parse_response(api_response: ApiResponse) -> Response {
    let candidates = api_response
        .candidates
        .into_iter()
        .map(|c| Candidate {
            parts: c
                .content
                .map(|content| content.parts.into_iter().map(|p| p.text).collect())
                .unwrap_or_default(),
            finish_reason: c.finish_reason,
        })
        .collect();

    Response { candidates }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Gemini::new("test-key");
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_client_with_model() {
        let client = Gemini::new("test-key").with_model("gemini-3-pro-preview");
        assert_eq!(client.model, "gemini-3-pro-preview");
    }

    #[test]
    fn test_request_builder() {
        let request = Request::new(vec![Content::user("Hello")])
            .with_system_instruction("You are a helpful assistant")
            .with_temperature(0.1)
            .with_top_p(0.1);

        assert!(request.system_instruction.is_some());
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.top_p, Some(0.1));
    }

    #[test]
    fn test_content_creation() {
        let user = Content::user("Hello");
        assert!(matches!(user.role, Role::User));
        assert_eq!(user.text, "Hello");

        let model = Content::model("Hi there");
        assert!(matches!(model.role, Role::Model));
    }

    #[test]
    fn test_request_serialization() {
        let request = Request::prompt("Hi")
            .with_system_instruction("Be brief")
            .with_temperature(0.1)
            .with_top_p(0.1);

        let json = serde_json::to_value(build_api_request(&request)).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be brief");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hi");
        assert_eq!(json["generationConfig"]["topP"], 0.1);
    }

    #[test]
    fn test_response_text_empty() {
        let response = Response { candidates: vec![] };
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response = Response {
            candidates: vec![Candidate {
                parts: vec!["Hello ".to_string(), "world".to_string()],
                finish_reason: Some("STOP".to_string()),
            }],
        };
        assert_eq!(response.text(), "Hello world");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Reply"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let api: ApiResponse = serde_json::from_str(json).unwrap();
        let response = parse_response(api);
        assert_eq!(response.text(), "Reply");
    }
}
