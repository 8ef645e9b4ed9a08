//! `closet-assistant`: conversational outfit recommendations.
//!
//! Sends the wardrobe inventory and the running conversation to an
//! OpenAI-compatible chat API and appends the reply to the transcript. The
//! reply is free text; nothing checks that it names items the user owns.
//!
//! # Flow
//!
//! ```text
//! Conversation::send(input, items)
//!     │  appends the user message, returns a PendingReply ticket
//!     ▼
//! ChatClient::reply(&pending.request)   ← async, no timeout
//!     │  failures become a fixed apology text
//!     ▼
//! Conversation::receive(pending, text)
//!        dropped if the conversation was closed or reset meanwhile
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use closet_assistant::{ChatClient, Conversation};
//!
//! let client = ChatClient::from_config(&config.assistant);
//! let mut conv = Conversation::new();
//! if let Some(pending) = conv.send("Make me a formal outfit", wardrobe.items().list()) {
//!     let text = client.reply(&pending.request).await;
//!     conv.receive(pending, text);
//! }
//! ```

pub mod client;
pub mod conversation;
pub mod error;
pub mod prompt;
pub mod types;


use closet_core::Item;

pub use client::{ChatClient, NO_SUGGESTION_REPLY, SERVICE_ERROR_REPLY};
pub use conversation::{Conversation, PendingReply, GREETING};
pub use error::AssistantError;
pub use prompt::{inventory_summary, system_prompt};
pub use types::{ChatMessage, Role};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Send one message and wait for the reply in place.
///
/// Returns the reply text, or `None` if the input was blank or the
/// conversation was closed before the reply arrived.
pub async fn ask(
    client: &ChatClient,
    conversation: &mut Conversation,
    input: &str,
    items: &[Item],
) -> Option<String> {
    let pending = conversation.send(input, items)?;
    let text = client.reply(&pending.request).await;
    conversation.receive(pending, text.clone()).then_some(text)
}
