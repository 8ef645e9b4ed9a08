use crate::error::{ClosetError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Directory under `$HOME` used when no explicit root is given.
pub const DEFAULT_ROOT_DIR: &str = ".closet";

pub const CONFIG_FILE: &str = "config.yaml";
pub const DATABASE_FILE: &str = "wardrobe.redb";
pub const IMAGES_DIR: &str = "images";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}

pub fn images_dir(root: &Path) -> PathBuf {
    root.join(IMAGES_DIR)
}

/// `$HOME/.closet`.
pub fn default_root() -> Result<PathBuf> {
    home::home_dir()
        .map(|h| h.join(DEFAULT_ROOT_DIR))
        .ok_or(ClosetError::HomeNotFound)
}
