use closet_core::config::AssistantConfig;

use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::{AssistantError, Result};

/// Shown when the service answers without any usable text.
pub const NO_SUGGESTION_REPLY: &str = "Sorry, I couldn't generate an outfit.";

/// Shown when the request fails for any reason.
pub const SERVICE_ERROR_REPLY: &str = "⚠️ API error or quota exceeded. Please try again later.";

// ─── ChatClient ───────────────────────────────────────────────────────────

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// No request timeout is set; a call lasts as long as the service takes.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Build from config, reading the key from `config.api_key_env`.
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(&config.endpoint, &config.model, config.api_key())
    }

    /// Send `messages` and return the first choice's text, or `None` when
    /// the response carries no text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>> {
        let Some(key) = &self.api_key else {
            return Err(AssistantError::MissingApiKey);
        };
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AssistantError::Server {
                status: status.as_u16(),
                body: text,
            });
        }
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|source| AssistantError::Parse {
                body: text.clone(),
                source,
            })?;
        Ok(parsed.first_text().map(str::to_string))
    }

    /// Like [`complete`](Self::complete) but never fails: errors become
    /// [`SERVICE_ERROR_REPLY`] and an empty answer becomes
    /// [`NO_SUGGESTION_REPLY`].
    pub async fn reply(&self, messages: &[ChatMessage]) -> String {
        match self.complete(messages).await {
            Ok(Some(text)) => text,
            Ok(None) => NO_SUGGESTION_REPLY.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "assistant request failed");
                SERVICE_ERROR_REPLY.to_string()
            }
        }
    }
}
