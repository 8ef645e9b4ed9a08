use super::open_wardrobe;
use crate::output::{describe_outfit, describe_saved, print_json};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum CustomSubcommand {
    /// Build an outfit from items at the given positions, in that order
    Create {
        /// Item positions as shown by `item list` (at least two)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<usize>,
    },
    /// List custom outfits
    List,
    /// Remove the custom outfit at a position (0-based)
    Remove { index: usize },
}

pub fn run(root: &Path, subcmd: CustomSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CustomSubcommand::Create { indexes } => create(root, &indexes, json),
        CustomSubcommand::List => list(root, json),
        CustomSubcommand::Remove { index } => remove(root, index, json),
    }
}

fn create(root: &Path, indexes: &[usize], json: bool) -> anyhow::Result<()> {
    let mut wardrobe = open_wardrobe(root)?;
    for &index in indexes {
        // Naming a position twice toggles it back off, as in the shell.
        if wardrobe.toggle_selection_at(index).is_none() {
            anyhow::bail!("no item at position {index}");
        }
    }
    wardrobe.create_custom_outfit()?;

    let created = wardrobe
        .custom_outfits()
        .list()
        .last()
        .context("custom outfit missing after create")?;
    if json {
        print_json(created)?;
    } else {
        println!("Created custom outfit {}:", wardrobe.custom_outfits().len() - 1);
        println!("{}", describe_outfit(&created.outfit));
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let wardrobe = open_wardrobe(root)?;
    let custom = wardrobe.custom_outfits().list();
    if json {
        print_json(&custom)?;
    } else {
        println!("{}", describe_saved(custom, "No custom outfits yet."));
    }
    Ok(())
}

fn remove(root: &Path, index: usize, json: bool) -> anyhow::Result<()> {
    let mut wardrobe = open_wardrobe(root)?;
    let removed = wardrobe
        .remove_custom_at(index)
        .context("failed to remove custom outfit")?;
    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else if removed.is_some() {
        println!("Removed custom outfit {index}.");
    } else {
        println!("No custom outfit at position {index}.");
    }
    Ok(())
}
