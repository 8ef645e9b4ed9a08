use crate::error::Result;
use crate::paths;
use crate::upload::{BlobStore, HttpBlobStore, LocalBlobStore};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AssistantConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the bearer key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl AssistantConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlobBackend {
    /// Copy images under `<root>/images`.
    #[default]
    Local,
    Http {
        endpoint: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_env: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub blob: BlobBackend,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            assistant: AssistantConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load `<root>/config.yaml`; a missing file means defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// The blob store selected by `storage.blob`.
    pub fn blob_store(&self, root: &Path) -> Box<dyn BlobStore> {
        match &self.storage.blob {
            BlobBackend::Local => Box::new(LocalBlobStore::new(root)),
            BlobBackend::Http {
                endpoint,
                token_env,
            } => {
                let token = token_env.as_deref().and_then(|v| std::env::var(v).ok());
                Box::new(HttpBlobStore::new(endpoint.clone(), token))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.assistant.endpoint.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "assistant.endpoint is empty".to_string(),
            });
        } else if !self.assistant.endpoint.starts_with("http") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "assistant.endpoint '{}' is not an http(s) URL",
                    self.assistant.endpoint
                ),
            });
        }

        if self.assistant.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "assistant.model is empty".to_string(),
            });
        }

        if self.assistant.api_key().is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "{} is not set; the assistant will answer with its fallback message",
                    self.assistant.api_key_env
                ),
            });
        }

        if let BlobBackend::Http { endpoint, .. } = &self.storage.blob {
            if endpoint.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "storage.blob.endpoint is empty".to_string(),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
