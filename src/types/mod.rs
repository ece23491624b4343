//! Wire types for the chat-completion API.

mod message;
mod response;
mod usage;

pub use message::{Message, Role};
pub use response::{ChatCompletion, Choice};
pub use usage::Usage;
