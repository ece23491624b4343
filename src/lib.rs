// Public modules
pub mod chat;
pub mod classify;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod pricing;
pub mod types;
pub mod usage;

// Re-exports
pub use classify::{Outcome, classify};
pub use client::{API_KEY_ENV, ChatRequest, OpenAi};
pub use config::FileConfig;
pub use conversation::Conversation;
pub use error::{ContextOverflow, Error, Result};
pub use pricing::{PricingEntry, PricingTable};
pub use types::*;
pub use usage::UsageTracker;
