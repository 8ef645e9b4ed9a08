use closet_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the wardrobe root directory.
///
/// Priority:
/// 1. `--root` flag / `CLOSET_ROOT` env var (passed in as `explicit`)
/// 2. `$HOME/.closet`
pub fn resolve_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    Ok(paths::default_root()?)
}
