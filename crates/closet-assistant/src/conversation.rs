use closet_core::Item;

use crate::prompt::system_prompt;
use crate::types::ChatMessage;

/// First message of every conversation.
pub const GREETING: &str = "Hi! I'm your wardrobe assistant. Ask me to build you an outfit! \
You can say things like 'Make me a formal outfit' or 'What should I wear in summer?'";

// ─── PendingReply ─────────────────────────────────────────────────────────

/// Ticket for an outstanding request.
///
/// Carries the messages to send and the conversation epoch at send time.
/// [`Conversation::receive`] drops the reply if the conversation was closed
/// or reset in between.
#[derive(Debug, Clone)]
pub struct PendingReply {
    epoch: u64,
    pub request: Vec<ChatMessage>,
}

// ─── Conversation ─────────────────────────────────────────────────────────

/// Running chat transcript with the assistant.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    epoch: u64,
    open: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            epoch: 0,
            open: true,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the conversation. Replies still in flight will be discarded.
    pub fn close(&mut self) {
        self.open = false;
        self.invalidate();
    }

    /// Start over from the greeting, discarding replies in flight.
    pub fn reset(&mut self) {
        self.messages = vec![ChatMessage::assistant(GREETING)];
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.epoch += 1;
    }

    /// Append the user's message and return the request to send. Blank
    /// input is ignored.
    ///
    /// The request is the system prompt built from `items` followed by the
    /// whole transcript, greeting included.
    pub fn send(&mut self, input: &str, items: &[Item]) -> Option<PendingReply> {
        if input.trim().is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(input));

        let mut request = Vec::with_capacity(self.messages.len() + 1);
        request.push(ChatMessage::system(system_prompt(items)));
        request.extend(self.messages.iter().cloned());
        Some(PendingReply {
            epoch: self.epoch,
            request,
        })
    }

    /// Apply a reply. Returns `false`, leaving the transcript untouched, if
    /// the conversation was closed or reset since `pending` was issued.
    pub fn receive(&mut self, pending: PendingReply, reply: impl Into<String>) -> bool {
        if pending.epoch != self.epoch {
            tracing::debug!("conversation changed while waiting, reply discarded");
            return false;
        }
        self.messages.push(ChatMessage::assistant(reply));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use closet_core::Category;

    fn items() -> Vec<Item> {
        vec![Item::new("Blazer", Category::Jacket, "Navy").with_occasion("Formal")]
    }

    #[test]
    fn starts_with_greeting() {
        let conv = Conversation::new();
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].role, Role::Assistant);
        assert!(conv.messages()[0].content.starts_with("Hi! I'm your wardrobe assistant."));
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut conv = Conversation::new();
        assert!(conv.send("   ", &items()).is_none());
        assert_eq!(conv.messages().len(), 1);
    }

    #[test]
    fn request_is_system_prompt_then_history() {
        let mut conv = Conversation::new();
        let pending = conv.send("Make me a formal outfit", &items()).unwrap();
        let roles: Vec<_> = pending.request.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::System, Role::Assistant, Role::User]);
        assert!(pending.request[0].content.contains("• Blazer (Jacket) - color: Navy"));
        assert_eq!(conv.messages().len(), 2);

        assert!(conv.receive(pending, "Try the navy blazer."));
        assert_eq!(conv.messages().len(), 3);
        assert_eq!(conv.messages()[2], ChatMessage::assistant("Try the navy blazer."));
    }

    #[test]
    fn reply_after_close_is_discarded() {
        let mut conv = Conversation::new();
        let pending = conv.send("summer outfit?", &items()).unwrap();
        conv.close();
        assert!(!conv.receive(pending, "late"));
        assert_eq!(conv.messages().len(), 2);

        conv.open();
        let pending = conv.send("again", &items()).unwrap();
        assert!(conv.receive(pending, "on time"));
    }

    #[test]
    fn reset_discards_transcript_and_inflight_reply() {
        let mut conv = Conversation::new();
        let pending = conv.send("hello", &items()).unwrap();
        conv.reset();
        assert!(!conv.receive(pending, "late"));
        assert_eq!(conv.messages().len(), 1);
    }
}
