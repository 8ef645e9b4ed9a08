use super::open_wardrobe;
use crate::output::{describe_saved, print_json};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum FavoriteSubcommand {
    /// List saved favorite outfits
    List,
    /// Remove the favorite at a position (0-based)
    Remove { index: usize },
}

pub fn run(root: &Path, subcmd: FavoriteSubcommand, json: bool) -> anyhow::Result<()> {
    let mut wardrobe = open_wardrobe(root)?;
    match subcmd {
        FavoriteSubcommand::List => {
            let favorites = wardrobe.favorites().list();
            if json {
                print_json(&favorites)?;
            } else {
                println!("{}", describe_saved(favorites, "No favorites yet."));
            }
        }
        FavoriteSubcommand::Remove { index } => {
            let removed = wardrobe
                .remove_favorite_at(index)
                .context("failed to remove favorite")?;
            if json {
                print_json(&serde_json::json!({ "removed": removed }))?;
            } else if removed.is_some() {
                println!("Removed favorite outfit {index}.");
            } else {
                println!("No favorite at position {index}.");
            }
        }
    }
    Ok(())
}
