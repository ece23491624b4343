//! Response classification.
//!
//! A pure mapping from `(HTTP status, response body)` to an [`Outcome`],
//! including the sub-parser for "context length exceeded" messages. The
//! session loop switches on the returned variant; nothing in this module
//! mutates conversation or usage state.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{ContextOverflow, Error};
use crate::types::{ChatCompletion, Message, Usage};

/// Pattern the service uses to report a context-length violation. The two
/// captures are the maximum allowed token count and the count actually sent.
const CONTEXT_OVERFLOW_PATTERN: &str =
    r"maximum context length is (\d+) tokens.*?resulted in (\d+) tokens";

/// The classified result of one request attempt.
///
/// Created per attempt and consumed immediately by the session loop; never
/// persisted.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The exchange succeeded: the assistant reply and its token usage.
    Success {
        /// The assistant message to append to the conversation.
        reply: Message,
        /// Token usage for this exchange.
        usage: Usage,
    },

    /// The attempt failed but the user may retry after rollback.
    Recoverable(Error),

    /// The attempt failed and the session should terminate.
    Fatal(Error),
}

impl Outcome {
    /// Returns true for the `Success` variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Returns true for the `Recoverable` variant.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Outcome::Recoverable(_))
    }

    /// Returns true for the `Fatal` variant.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Fatal(_))
    }
}

/// Error body shape: `{"error": {"code": ..., "message": ...}}`. Both
/// fields may be absent, in which case the raw body is surfaced instead.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// Classifies one HTTP exchange into an [`Outcome`].
///
/// | status | classification |
/// |---|---|
/// | 200 | `Success` (reply + usage extracted from the body) |
/// | 400 | `Fatal`, with context-length detail when the error code matches |
/// | 401 | `Fatal` (invalid credential) |
/// | 429 | `Recoverable` (rate limit or quota) |
/// | 502, 503 | `Recoverable` (upstream overload) |
/// | other | `Fatal` (raw body surfaced) |
pub fn classify(status: u16, body: &str) -> Outcome {
    match status {
        200 => classify_success(body),
        400 => classify_bad_request(body),
        401 => Outcome::Fatal(Error::authentication("invalid API key")),
        429 => Outcome::Recoverable(Error::rate_limit(
            "rate limit or maximum monthly limit exceeded",
        )),
        502 | 503 => Outcome::Recoverable(Error::service_unavailable(
            "the server seems to be overloaded",
        )),
        _ => Outcome::Fatal(Error::api(status, body)),
    }
}

fn classify_success(body: &str) -> Outcome {
    let completion = match serde_json::from_str::<ChatCompletion>(body) {
        Ok(completion) => completion,
        Err(err) => {
            return Outcome::Fatal(Error::serialization(
                format!("failed to parse response: {err}"),
                Some(Box::new(err)),
            ));
        }
    };
    match completion.choices.into_iter().next() {
        Some(choice) => Outcome::Success {
            reply: choice.message,
            usage: completion.usage,
        },
        None => Outcome::Fatal(Error::serialization("response contained no choices", None)),
    }
}

fn classify_bad_request(body: &str) -> Outcome {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);
    let Some(detail) = detail else {
        return Outcome::Fatal(Error::bad_request(format!(
            "could not find error details in API response: {body}"
        )));
    };

    let message = detail.message.unwrap_or_default();
    if detail.code.as_deref() == Some("context_length_exceeded") {
        return Outcome::Fatal(Error::context_length_exceeded(parse_context_overflow(
            &message,
        )));
    }

    if message.is_empty() {
        Outcome::Fatal(Error::bad_request(body))
    } else {
        Outcome::Fatal(Error::bad_request(message))
    }
}

/// Extracts the maximum and sent token counts from a context-length error
/// message. Returns `None` when the message does not match the expected
/// pattern, in which case the caller falls back to a generic report.
pub fn parse_context_overflow(message: &str) -> Option<ContextOverflow> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(CONTEXT_OVERFLOW_PATTERN).ok())
        .as_ref()?;
    let captures = pattern.captures(message)?;
    let max_tokens = captures.get(1)?.as_str().parse().ok()?;
    let sent_tokens = captures.get(2)?.as_str().parse().ok()?;
    Some(ContextOverflow::new(max_tokens, sent_tokens))
}
