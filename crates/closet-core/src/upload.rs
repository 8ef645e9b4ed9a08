//! Item images and the blob store that holds them.
//!
//! The catalog never touches image bytes after upload; an item only keeps
//! the URL the blob store hands back.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{ClosetError, Result};

// ---------------------------------------------------------------------------
// ImageUpload
// ---------------------------------------------------------------------------

/// Upload progress for the image attached to an item draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageUpload {
    #[default]
    Empty,
    Uploading,
    Ready(String),
    /// The upload did not complete; the reason is shown and the user may
    /// retry with another `run`.
    Failed(String),
}

impl ImageUpload {
    pub fn is_uploading(&self) -> bool {
        matches!(self, ImageUpload::Uploading)
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageUpload::Ready(url) => Some(url),
            _ => None,
        }
    }

    pub fn begin(&mut self) {
        *self = ImageUpload::Uploading;
    }

    pub fn finish(&mut self, outcome: Result<String>) {
        *self = match outcome {
            Ok(url) => ImageUpload::Ready(url),
            Err(e) => {
                tracing::warn!(error = %e, "image upload failed");
                ImageUpload::Failed(e.to_string())
            }
        };
    }

    /// Upload `bytes` through `store`, ending in `Ready` or `Failed`.
    pub fn run(&mut self, store: &dyn BlobStore, bytes: &[u8], filename: &str) {
        self.begin();
        let outcome = store.upload(bytes, filename);
        self.finish(outcome);
    }
}

// ---------------------------------------------------------------------------
// BlobStore
// ---------------------------------------------------------------------------

pub trait BlobStore {
    /// Store `bytes` and return a URL that retrieves them.
    fn upload(&self, bytes: &[u8], filename: &str) -> Result<String>;
}

/// `images/<unix-millis>-<filename>`, with the filename reduced to a safe
/// single path segment.
pub fn object_name(filename: &str, now: DateTime<Utc>) -> String {
    let base = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let safe: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = if safe.is_empty() { "image".to_string() } else { safe };
    format!("images/{}-{}", now.timestamp_millis(), safe)
}

// ---------------------------------------------------------------------------
// LocalBlobStore
// ---------------------------------------------------------------------------

/// Keeps images on disk under the wardrobe root and returns `file://` URLs.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl BlobStore for LocalBlobStore {
    fn upload(&self, bytes: &[u8], filename: &str) -> Result<String> {
        let path = self.root.join(object_name(filename, Utc::now()));
        crate::io::atomic_write(&path, bytes)?;
        Ok(format!("file://{}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// HttpBlobStore
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// PUTs image bytes to `<endpoint>/<object>`. The service must answer with
/// a JSON body carrying the public `url`.
pub struct HttpBlobStore {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpBlobStore {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            token,
        }
    }
}

impl BlobStore for HttpBlobStore {
    fn upload(&self, bytes: &[u8], filename: &str) -> Result<String> {
        let url = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            object_name(filename, Utc::now())
        );
        let mut req = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec());
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .map_err(|e| ClosetError::Upload(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| ClosetError::Upload(e.to_string()))?;
        if !status.is_success() {
            return Err(ClosetError::Upload(format!("HTTP {status}: {body}")));
        }
        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ClosetError::Upload(format!("malformed response: {e}")))?;
        tracing::debug!(%url, "image uploaded");
        Ok(parsed.url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
