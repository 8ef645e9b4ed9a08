use super::{open_wardrobe, FilterArgs};
use crate::output::{describe_outfit, print_json};
use anyhow::Context;
use closet_core::ClosetError;
use std::path::Path;

pub fn run(root: &Path, filters: &FilterArgs, save: bool, json: bool) -> anyhow::Result<()> {
    let mut wardrobe = open_wardrobe(root)?;
    let filter = filters.to_filter(None);

    let outfit = match wardrobe.suggest_outfit(&filter, &mut rand::thread_rng()) {
        Ok(outfit) => outfit,
        Err(ClosetError::NoMatchingItems) => {
            if json {
                print_json(&serde_json::json!({ "outfit": [], "saved": false }))?;
            } else {
                println!("No matching items found!");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let saved = if save {
        wardrobe
            .save_favorite(&outfit)
            .context("failed to save favorite")?
            .is_some()
    } else {
        false
    };

    if json {
        print_json(&serde_json::json!({ "outfit": outfit, "saved": saved }))?;
        return Ok(());
    }
    println!("Suggested outfit:");
    println!("{}", describe_outfit(&outfit));
    if saved {
        println!("Saved to favorites.");
    }
    Ok(())
}
