use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse chat response: {source}\n  body: {body}")]
    Parse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Server error: HTTP {status} - {body}")]
    Server { status: u16, body: String },

    #[error("API key not set")]
    MissingApiKey,
}
