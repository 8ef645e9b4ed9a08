use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClosetError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown category '{0}'")]
    InvalidCategory(String),

    #[error("image upload still in progress")]
    UploadInProgress,

    #[error("image upload failed: {0}")]
    Upload(String),

    #[error("no matching items found")]
    NoMatchingItems,

    #[error("a custom outfit needs at least {needed} selected items, got {got}")]
    NotEnoughSelections { needed: usize, got: usize },

    #[error("{0} id counter exhausted")]
    IdOverflow(&'static str),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("corrupt stored value under '{key}': {source}")]
    CorruptValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClosetError>;
