use super::{open_wardrobe, FilterArgs};
use crate::output::{item_table, print_json};
use anyhow::Context;
use clap::Subcommand;
use closet_core::config::Config;
use closet_core::upload::ImageUpload;
use closet_core::ItemDraft;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ItemSubcommand {
    /// Add an item to the wardrobe
    Add {
        /// Item name
        name: String,
        /// One of Top, Shirt, Hoodie, Jacket, Trousers, Shoes, Skirt, Dress, Accessories
        #[arg(long)]
        category: String,
        #[arg(long)]
        color: String,
        #[arg(long)]
        occasion: Option<String>,
        #[arg(long)]
        season: Option<String>,
        /// Photo to upload and attach
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// List items, optionally filtered
    List {
        /// Case-insensitive match on name or category
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Remove the item at a position (0-based, as shown by `item list`)
    Remove { index: usize },
}

pub fn run(root: &Path, subcmd: ItemSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ItemSubcommand::Add {
            name,
            category,
            color,
            occasion,
            season,
            image,
        } => {
            let draft = ItemDraft {
                name,
                category,
                color,
                occasion: occasion.unwrap_or_default(),
                season: season.unwrap_or_default(),
                image: ImageUpload::Empty,
            };
            add(root, draft, image.as_deref(), json)
        }
        ItemSubcommand::List { search, filters } => {
            list(root, search.as_deref(), &filters, json)
        }
        ItemSubcommand::Remove { index } => remove(root, index, json),
    }
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

fn add(root: &Path, mut draft: ItemDraft, image: Option<&Path>, json: bool) -> anyhow::Result<()> {
    // Validate the text fields before spending an upload on them.
    draft.build()?;

    if let Some(path) = image {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let config = Config::load(root).context("failed to load config")?;
        let store = config.blob_store(root);
        draft.image.run(store.as_ref(), &bytes, &filename);
        if let ImageUpload::Failed(reason) = &draft.image {
            anyhow::bail!("image upload failed: {reason}; the item was not added");
        }
    }

    let item = draft.build()?;
    let mut wardrobe = open_wardrobe(root)?;
    let id = wardrobe.add_item(item).context("failed to save item")?;
    let position = wardrobe.items().position(id).unwrap_or_default();
    let added = wardrobe.items().get(id);

    if json {
        print_json(&serde_json::json!({
            "position": position,
            "item": added,
        }))?;
    } else if let Some(item) = added {
        println!("Added '{}' ({}) at position {position}.", item.name, item.category);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(root: &Path, search: Option<&str>, filters: &FilterArgs, json: bool) -> anyhow::Result<()> {
    let wardrobe = open_wardrobe(root)?;
    let filter = filters.to_filter(search);
    let rows = wardrobe.filtered(&filter);

    if json {
        let value: Vec<_> = rows
            .iter()
            .map(|(pos, item)| serde_json::json!({ "position": pos, "item": item }))
            .collect();
        print_json(&value)?;
        return Ok(());
    }

    if rows.is_empty() {
        if wardrobe.items().is_empty() {
            println!("No items yet. Add one with `closet item add`.");
        } else {
            println!("No items match.");
        }
        return Ok(());
    }
    print!("{}", item_table(&rows));
    Ok(())
}

// ---------------------------------------------------------------------------
// remove
// ---------------------------------------------------------------------------

fn remove(root: &Path, index: usize, json: bool) -> anyhow::Result<()> {
    let mut wardrobe = open_wardrobe(root)?;
    let removed = wardrobe
        .remove_item_at(index)
        .context("failed to remove item")?;

    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
        return Ok(());
    }
    match removed {
        Some(item) => println!("Removed '{}'.", item.name),
        None => println!("No item at position {index}."),
    }
    Ok(())
}
