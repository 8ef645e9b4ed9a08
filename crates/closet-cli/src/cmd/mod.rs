pub mod chat;
pub mod config;
pub mod custom;
pub mod dark_mode;
pub mod favorite;
pub mod item;
pub mod suggest;

use anyhow::Context;
use clap::Args;
use closet_core::kv::RedbStore;
use closet_core::{paths, Filter, Wardrobe};
use std::path::Path;

/// Open the wardrobe database under `root`, creating it if needed.
pub fn open_wardrobe(root: &Path) -> anyhow::Result<Wardrobe> {
    let db = paths::database_path(root);
    let store = RedbStore::open(&db)
        .with_context(|| format!("failed to open wardrobe database {}", db.display()))?;
    Wardrobe::open(store).context("failed to restore wardrobe")
}

/// Attribute constraints shared by `item list` and `suggest`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only items of this color
    #[arg(long)]
    pub color: Option<String>,
    /// Only items for this occasion
    #[arg(long)]
    pub occasion: Option<String>,
    /// Only items for this season
    #[arg(long)]
    pub season: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self, search: Option<&str>) -> Filter {
        Filter {
            search: search.unwrap_or_default().to_string(),
            color: self.color.clone().unwrap_or_default(),
            occasion: self.occasion.clone().unwrap_or_default(),
            season: self.season.clone().unwrap_or_default(),
        }
    }
}
