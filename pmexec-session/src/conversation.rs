//! Append-only chat transcript.

use pmexec_core::{ConversationMessage, MessageRole, Timestamp};

/// First assistant message of every session.
pub const GREETING: &str = "System Initialized. I am your PMBOK execution specialist. \
How can I help you optimize your resources and team performance today?";

/// Assistant message appended when a request fails for any reason.
pub const FALLBACK_MESSAGE: &str = "Verification failed. Please ensure resource source and \
type are specified according to PMBOK 8th Edition standards.";

/// Ordered list of transcript messages. Messages are only ever appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationLog {
    messages: Vec<ConversationMessage>,
}

impl ConversationLog {
    /// A transcript holding only the greeting.
    pub fn greeted(at: Timestamp) -> Self {
        let mut log = Self::default();
        log.push_assistant(GREETING, at);
        log
    }

    pub fn push_user(&mut self, content: impl Into<String>, at: Timestamp) {
        self.messages.push(ConversationMessage::user(content, at));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, at: Timestamp) {
        self.messages.push(ConversationMessage::assistant(content, at));
    }

    pub fn push_fallback(&mut self, at: Timestamp) {
        self.push_assistant(FALLBACK_MESSAGE, at);
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages sent by `role`, oldest first.
    pub fn by_role(&self, role: MessageRole) -> impl Iterator<Item = &ConversationMessage> {
        self.messages.iter().filter(move |m| m.role == role)
    }
}
