//! Core chat session management.
//!
//! `ChatSession` owns the conversation ledger and the usage totals and is
//! the only place either is mutated. A turn appends the user message
//! speculatively, dispatches the request, and then settles the classified
//! outcome: success commits the assistant reply and the usage delta, any
//! failure rolls the speculative message back so the ledger reflects
//! exactly the accepted exchanges.

use crate::chat::config::ChatConfig;
use crate::classify::Outcome;
use crate::client::{ChatRequest, OpenAi};
use crate::conversation::Conversation;
use crate::error::{Error, Result};
use crate::pricing::PricingTable;
use crate::types::Message;
use crate::usage::UsageTracker;

/// The result of one turn, consumed by the session loop.
#[derive(Debug, Clone)]
pub enum Turn {
    /// The exchange succeeded; the assistant's reply text to render.
    Reply(String),

    /// Recoverable failure; the ledger was rolled back and the user may
    /// resend.
    Retry(Error),

    /// Fatal failure; the session should terminate after the diagnostic.
    Fatal(Error),
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model in effect.
    pub model: String,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// Total prompt tokens across all accepted exchanges.
    pub prompt_tokens: u64,
    /// Total completion tokens across all accepted exchanges.
    pub completion_tokens: u64,
}

/// A chat session: conversation state, dispatch, and usage accounting.
pub struct ChatSession {
    client: OpenAi,
    config: ChatConfig,
    conversation: Conversation,
    usage: UsageTracker,
    pricing: PricingTable,
}

impl ChatSession {
    /// Creates a new session. When markdown formatting is enabled the
    /// conversation is seeded with the one-time system directive.
    pub fn new(client: OpenAi, config: ChatConfig) -> Self {
        let mut conversation = Conversation::new();
        if config.markdown {
            conversation.enable_markdown_directive();
        }
        Self {
            client,
            config,
            conversation,
            usage: UsageTracker::new(),
            pricing: PricingTable::new(),
        }
    }

    /// Appends an externally supplied context block as a system message.
    /// Call before the first user turn.
    pub fn add_context(&mut self, text: impl Into<String>) {
        self.conversation.add_context(text);
    }

    /// Sends one user turn and settles the outcome.
    pub async fn send(&mut self, input: &str) -> Turn {
        self.conversation.push(Message::user(input));
        let outcome = {
            let request = ChatRequest {
                model: &self.config.model,
                temperature: self.config.temperature,
                messages: self.conversation.snapshot(),
                max_tokens: self.config.max_tokens,
            };
            self.client.send(&request).await
        };
        self.settle(outcome)
    }

    /// Commits or rolls back the speculative user message based on the
    /// classified outcome. Separated from `send` so the state transitions
    /// can be exercised without a network.
    fn settle(&mut self, outcome: Outcome) -> Turn {
        match outcome {
            Outcome::Success { reply, usage } => {
                let text = reply.content.trim().to_string();
                self.conversation.push(reply);
                self.usage.record(usage);
                Turn::Reply(text)
            }
            Outcome::Recoverable(err) => {
                self.conversation.rollback_last();
                Turn::Retry(err)
            }
            Outcome::Fatal(err) => {
                self.conversation.rollback_last();
                Turn::Fatal(err)
            }
        }
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.conversation.len()
    }

    /// Returns the model in effect.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Total tokens used so far, for the prompt label.
    pub fn total_tokens(&self) -> u64 {
        self.usage.total_tokens()
    }

    /// Estimated cost of the session so far.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModelPricing` when the current model has no pricing
    /// entry; per the accounting contract that is surfaced at summary time
    /// rather than mid-conversation.
    pub fn cost(&self) -> Result<String> {
        self.usage.cost(&self.config.model, &self.pricing)
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            message_count: self.message_count(),
            prompt_tokens: self.usage.prompt_tokens(),
            completion_tokens: self.usage.completion_tokens(),
        }
    }

    /// Formats the end-of-session usage/cost summary.
    pub fn summary(&self) -> Result<String> {
        let cost = self.cost()?;
        Ok(format!(
            "Session total: {} tokens (${})",
            self.usage.total_tokens(),
            cost
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Usage;

    fn test_config() -> ChatConfig {
        ChatConfig {
            api_key: Some("test-key".to_string()),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 1.0,
            max_tokens: None,
            markdown: false,
            multiline: false,
        }
    }

    fn test_session(config: ChatConfig) -> ChatSession {
        let client = OpenAi::new(Some("test-key".to_string())).unwrap();
        ChatSession::new(client, config)
    }

    #[test]
    fn new_session_empty_without_markdown() {
        let session = test_session(test_config());
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.total_tokens(), 0);
    }

    #[test]
    fn markdown_config_seeds_directive() {
        let mut config = test_config();
        config.markdown = true;
        let session = test_session(config);
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn context_blocks_precede_first_turn() {
        let mut session = test_session(test_config());
        session.add_context("background");
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn success_commits_two_messages_and_usage() {
        let mut session = test_session(test_config());
        session.conversation.push(Message::user("hello"));

        let turn = session.settle(Outcome::Success {
            reply: Message::assistant("  hi there  "),
            usage: Usage::new(10, 5),
        });

        let Turn::Reply(text) = turn else {
            panic!("expected reply");
        };
        assert_eq!(text, "hi there");
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.total_tokens(), 15);
    }

    #[test]
    fn recoverable_failure_rolls_back() {
        let mut session = test_session(test_config());
        session.conversation.push(Message::user("kept"));
        let before = session.conversation.snapshot().to_vec();

        session.conversation.push(Message::user("speculative"));
        let turn = session.settle(Outcome::Recoverable(Error::rate_limit("slow down")));

        assert!(matches!(turn, Turn::Retry(_)));
        assert_eq!(session.conversation.snapshot(), before.as_slice());
        assert_eq!(session.total_tokens(), 0);
    }

    #[test]
    fn fatal_failure_rolls_back_too() {
        let mut session = test_session(test_config());
        session.conversation.push(Message::user("speculative"));

        let turn = session.settle(Outcome::Fatal(Error::authentication("bad key")));

        assert!(matches!(turn, Turn::Fatal(_)));
        assert_eq!(session.message_count(), 0);
    }

    #[test]
    fn usage_only_grows_on_success() {
        let mut session = test_session(test_config());
        session.conversation.push(Message::user("a"));
        session.settle(Outcome::Recoverable(Error::service_unavailable("busy")));
        assert_eq!(session.total_tokens(), 0);

        session.conversation.push(Message::user("a"));
        session.settle(Outcome::Success {
            reply: Message::assistant("b"),
            usage: Usage::new(3, 4),
        });
        assert_eq!(session.total_tokens(), 7);
    }

    #[test]
    fn summary_uses_current_model_rates() {
        let mut session = test_session(test_config());
        session.conversation.push(Message::user("a"));
        session.settle(Outcome::Success {
            reply: Message::assistant("b"),
            usage: Usage::new(1000, 500),
        });

        // gpt-3.5-turbo: 0.0015 prompt, 0.002 completion per 1k tokens.
        assert_eq!(
            session.summary().unwrap(),
            "Session total: 1500 tokens ($0.002500)"
        );
    }

    #[test]
    fn summary_with_unknown_model_fails_at_summary_time() {
        let mut config = test_config();
        config.model = "fine-tuned-custom".to_string();
        let session = test_session(config);
        assert!(session.summary().is_err());
    }

    #[test]
    fn clear_session() {
        let mut session = test_session(test_config());
        session.conversation.push(Message::user("test"));
        assert_eq!(session.message_count(), 1);

        session.clear();
        assert_eq!(session.message_count(), 0);
    }
}
