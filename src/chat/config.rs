//! Configuration types for the chat application.
//!
//! CLI argument parsing via `arrrg`, plus the resolved per-session
//! configuration combining file, environment, and flag sources.

use arrrg_derive::CommandLine;

use crate::config::FileConfig;

/// Command-line arguments for the converse tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Path to the YAML configuration file.
    #[arrrg(optional, "Path to the configuration file", "PATH")]
    pub config: Option<String>,

    /// Context file appended as a system message before the first turn.
    /// Additional context files may be given as free arguments; if the
    /// flag is repeated the last occurrence wins.
    #[arrrg(optional, "Path to a context file", "FILE")]
    pub context: Option<String>,

    /// API key override.
    #[arrrg(optional, "Set the API key", "KEY")]
    pub key: Option<String>,

    /// Model override.
    #[arrrg(optional, "Set the model", "MODEL")]
    pub model: Option<String>,

    /// Use the multiline input mode.
    #[arrrg(flag, "Use the multiline input mode")]
    pub multiline: bool,
}

/// Resolved configuration for a chat session.
///
/// Precedence for the credential: command-line flag, then the environment
/// variable, then the configuration file. The model flag likewise
/// overrides the file value; the multiline flag is additive (the flag
/// enables it even when the file leaves it off).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The API credential, if any source supplied one.
    pub api_key: Option<String>,

    /// The model to use for generating responses.
    pub model: String,

    /// Sampling temperature sent on every request.
    pub temperature: f64,

    /// Optional maximum-output-token bound.
    pub max_tokens: Option<u32>,

    /// Whether the markdown formatting directive is seeded.
    pub markdown: bool,

    /// Whether multiline input mode is active.
    pub multiline: bool,
}

impl ChatConfig {
    /// Combines the file configuration with the environment credential and
    /// command-line overrides.
    pub fn resolve(file: FileConfig, args: &ChatArgs, env_key: Option<String>) -> Self {
        let api_key = args
            .key
            .as_deref()
            .map(|key| key.trim().to_string())
            .or_else(|| env_key.map(|key| key.trim().to_string()))
            .or(file.api_key);
        let model = args
            .model
            .as_deref()
            .map(|model| model.trim().to_string())
            .unwrap_or(file.model);

        ChatConfig {
            api_key,
            model,
            temperature: file.temperature,
            max_tokens: file.max_tokens,
            markdown: file.markdown,
            multiline: args.multiline || file.multiline,
        }
    }
}
