//! Conversation session for a single turn
//!
//! Collects outbound replies and tracks the end-of-turn signal.

use tracing::warn;

#[derive(Debug, Clone)]
pub struct Session {
    conversation_id: String,
    text: String,
    replies: Vec<String>,
    ended: bool,
}

impl Session {
    pub fn new(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
            replies: Vec::new(),
            ended: false,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Verbatim text of the inbound message
    pub fn message_text(&self) -> &str {
        &self.text
    }

    /// Queue a reply for the user. Ignored once the turn has ended.
    pub fn send(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.ended {
            warn!(
                conversation_id = %self.conversation_id,
                "Dropping reply sent after end of turn"
            );
            return;
        }
        self.replies.push(text);
    }

    /// Mark the turn finished. Only the first call has any effect.
    pub fn end_dialog(&mut self) {
        if self.ended {
            warn!(conversation_id = %self.conversation_id, "Turn already ended");
            return;
        }
        self.ended = true;
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    pub fn into_replies(self) -> Vec<String> {
        self.replies
    }
}
