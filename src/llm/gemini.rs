//! Gemini REST client and chat session.
//!
//! The Gemini `generateContent` endpoint is stateless, so multi-turn context
//! lives client-side: each session keeps the full turn history and replays
//! it on every call, the same way the official client libraries do.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::advisor::core::config::AdvisorConfig;
use crate::advisor::core::errors::{AdvisorError, AdvisorResult};
use crate::advisor::prompt::SYSTEM_INSTRUCTION;
use crate::llm::{ChatProvider, ChatSession};

/// Role label for user turns.
const ROLE_USER: &str = "user";
/// Role label for model turns.
const ROLE_MODEL: &str = "model";

/// Cap on the response-body snippet included in upstream error messages.
const ERROR_BODY_SNIPPET: usize = 200;

/// One turn of content on the Gemini wire format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    /// `user` or `model`; empty for the system instruction.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    /// Content fragments; this client only uses text parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single text fragment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    /// The fragment text.
    #[serde(default)]
    pub text: String,
}

impl Content {
    fn from_text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    #[serde(rename = "systemInstruction")]
    system_instruction: &'a Content,
    contents: &'a [Content],
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Extract the first candidate's text, concatenating its parts.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(
            content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect(),
        )
    }
}

/// Gemini API client holding the fixed session configuration.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    system_instruction: Content,
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &AdvisorConfig) -> AdvisorResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_instruction: Content::from_text("", SYSTEM_INSTRUCTION),
        })
    }

    async fn generate(&self, contents: &[Content]) -> AdvisorResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateContentRequest {
            system_instruction: &self.system_instruction,
            contents,
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(ERROR_BODY_SNIPPET).collect();
            return Err(AdvisorError::Upstream(format!(
                "gemini returned status {status}: {snippet}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .text()
            .ok_or_else(|| AdvisorError::Upstream("gemini returned no candidate text".to_string()))
    }
}

impl ChatProvider for GeminiClient {
    fn create_session(&self) -> AdvisorResult<Arc<dyn ChatSession>> {
        Ok(Arc::new(GeminiChatSession {
            client: self.clone(),
            history: Mutex::new(Vec::new()),
        }))
    }
}

/// A multi-turn Gemini chat session.
///
/// Holding the history lock across the provider call serializes turns within
/// one conversation, so interleaved prompts cannot corrupt the transcript.
pub struct GeminiChatSession {
    client: GeminiClient,
    history: Mutex<Vec<Content>>,
}

#[async_trait]
impl ChatSession for GeminiChatSession {
    async fn send(&self, prompt: &str) -> AdvisorResult<String> {
        let mut history = self.history.lock().await;
        history.push(Content::from_text(ROLE_USER, prompt));

        let text = match self.client.generate(&history).await {
            Ok(text) => text,
            Err(err) => {
                // A failed turn is not part of the conversation.
                history.pop();
                return Err(err);
            }
        };

        history.push(Content::from_text(ROLE_MODEL, &text));
        debug!(turns = history.len(), "gemini turn completed");

        Ok(text)
    }

    async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_system_instruction() {
        let system = Content::from_text("", "be helpful");
        let contents = vec![Content::from_text(ROLE_USER, "hello")];
        let request = GenerateContentRequest {
            system_instruction: &system,
            contents: &contents,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn response_text_joins_candidate_parts() {
        let raw = r#"{
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{"text": "Cash flow is "}, {"text": "money in motion."}]
                    }
                }
            ]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.text().unwrap(),
            "Cash flow is money in motion."
        );
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.text().is_none());
    }
}
