use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use closet_core::config::{BlobBackend, Config, WarnLevel};
use closet_core::paths;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Write a default config.yaml if none exists
    Init,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Init => init(root),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }

    let key_state = if config.assistant.api_key().is_some() {
        "set"
    } else {
        "not set"
    };
    println!("Root:       {}", root.display());
    println!("Endpoint:   {}", config.assistant.endpoint);
    println!("Model:      {}", config.assistant.model);
    println!("API key:    ${} ({key_state})", config.assistant.api_key_env);
    match &config.storage.blob {
        BlobBackend::Local => {
            println!("Images:     local ({})", paths::images_dir(root).display())
        }
        BlobBackend::Http { endpoint, .. } => println!("Images:     http ({endpoint})"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(root: &Path) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    if path.exists() {
        println!("Config already exists at {}.", path.display());
        return Ok(());
    }
    Config::default()
        .save(root)
        .context("failed to write config")?;
    println!("Wrote {}.", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
