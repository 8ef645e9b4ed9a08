use super::open_wardrobe;
use crate::output::print_json;
use anyhow::Context;
use clap::ValueEnum;
use std::path::Path;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DarkModeArg {
    On,
    Off,
    Toggle,
}

pub fn run(root: &Path, mode: Option<DarkModeArg>, json: bool) -> anyhow::Result<()> {
    let mut wardrobe = open_wardrobe(root)?;
    match mode {
        Some(DarkModeArg::On) => wardrobe.set_dark_mode(true),
        Some(DarkModeArg::Off) => wardrobe.set_dark_mode(false),
        Some(DarkModeArg::Toggle) => wardrobe.toggle_dark_mode().map(|_| ()),
        None => Ok(()),
    }
    .context("failed to save preference")?;

    let on = wardrobe.dark_mode();
    if json {
        print_json(&serde_json::json!({ "dark_mode": on }))?;
    } else {
        println!("Dark mode: {}", if on { "on" } else { "off" });
    }
    Ok(())
}
