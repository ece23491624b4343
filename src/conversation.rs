//! The in-memory message ledger.
//!
//! The conversation is the single source of truth sent on every request:
//! an ordered sequence of role-tagged messages reflecting exactly the
//! accepted exchanges so far. A failed exchange must leave it untouched,
//! which is why user messages are appended speculatively and rolled back
//! when an attempt fails.

use crate::types::Message;

/// System directive appended once when markdown formatting is enabled.
const MARKDOWN_DIRECTIVE: &str = "Always use code blocks with the appropriate language tags. \
     If asked for a table always format it using Markdown syntax.";

/// Ordered sequence of role-tagged messages.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the end of the sequence.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Removes and returns the most recently appended message.
    ///
    /// Used to undo a speculative user-message append when the subsequent
    /// request attempt fails.
    pub fn rollback_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    /// Returns the full ordered sequence for request construction.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the conversation.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true when the conversation holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Appends the one-time system directive asking the service to format
    /// replies as code blocks and Markdown tables.
    pub fn enable_markdown_directive(&mut self) {
        self.push(Message::system(MARKDOWN_DIRECTIVE));
    }

    /// Appends an externally supplied context block as a system message.
    ///
    /// Context blocks are appended before the first user turn, in the
    /// order supplied.
    pub fn add_context(&mut self, text: impl Into<String>) {
        self.push(Message::system(text));
    }
}
