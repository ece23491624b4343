use serde::{Deserialize, Serialize};

use crate::types::{Message, Usage};

/// One candidate completion in a successful response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    /// The assistant message for this choice.
    pub message: Message,
}

/// A successful chat-completion response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatCompletion {
    /// Candidate completions; the client consumes the first.
    pub choices: Vec<Choice>,

    /// Token usage for the exchange.
    pub usage: Usage,
}
