use super::open_wardrobe;
use crate::output::print_json;
use anyhow::Context;
use closet_assistant::{ChatClient, Conversation};
use closet_core::config::Config;
use std::path::Path;

/// Ask the assistant a single question about the current wardrobe.
pub fn run(root: &Path, message: &str, json: bool) -> anyhow::Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("message must not be empty");
    }
    let config = Config::load(root).context("failed to load config")?;
    let wardrobe = open_wardrobe(root)?;
    let client = ChatClient::from_config(&config.assistant);
    let mut conversation = Conversation::new();

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let reply = rt
        .block_on(closet_assistant::ask(
            &client,
            &mut conversation,
            message,
            wardrobe.items().list(),
        ))
        .unwrap_or_default();

    if json {
        print_json(&serde_json::json!({ "reply": reply }))?;
    } else {
        println!("{reply}");
    }
    Ok(())
}
