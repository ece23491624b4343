//! Chat application module for interactive conversations.
//!
//! This module provides the REPL chat interface built on top of the
//! converse client library:
//!
//! - [`config`]: CLI argument parsing and resolved session configuration
//! - [`session`]: conversation state, dispatch, and usage accounting
//! - [`commands`]: slash command parsing
//! - [`render`]: terminal output

mod commands;
mod config;
mod render;
mod session;

pub use commands::{ChatCommand, InputAction, help_text, parse_command, triage_input};
pub use config::{ChatArgs, ChatConfig};
pub use render::{PlainTextRenderer, Renderer};
pub use session::{ChatSession, SessionStats, Turn};
