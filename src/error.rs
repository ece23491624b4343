//! Error types for the converse client.
//!
//! The taxonomy distinguishes recoverable failures (the conversation is
//! rolled back and the user may resend) from fatal failures (the session
//! terminates after a diagnostic).

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Structured detail for a context-length violation, extracted from the
/// service's human-readable error message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ContextOverflow {
    /// Maximum context length the model allows, in tokens.
    pub max_tokens: u64,
    /// Token count the request actually carried.
    pub sent_tokens: u64,
}

impl ContextOverflow {
    /// Creates a new overflow detail record.
    pub fn new(max_tokens: u64, sent_tokens: u64) -> Self {
        Self {
            max_tokens,
            sent_tokens,
        }
    }

    /// Tokens over the limit.
    pub fn excess(&self) -> u64 {
        self.sent_tokens.saturating_sub(self.max_tokens)
    }
}

/// The main error type for the converse client.
#[derive(Clone, Debug)]
pub enum Error {
    /// Connection-level failure (refused, reset, DNS).
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The request did not complete within the transport timeout.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// The credential was rejected.
    Authentication {
        /// Human-readable error message.
        message: String,
    },

    /// Rate limit or monthly quota exceeded.
    RateLimit {
        /// Human-readable error message.
        message: String,
    },

    /// Upstream overload (502/503).
    ServiceUnavailable {
        /// Human-readable error message.
        message: String,
    },

    /// The accumulated conversation no longer fits the model's context
    /// window. Retrying without trimming history would fail identically.
    ContextLengthExceeded {
        /// Structured detail, when the service message could be parsed.
        overflow: Option<ContextOverflow>,
    },

    /// The service rejected the request (400) for a reason other than
    /// context length. The raw body is surfaced to the user.
    BadRequest {
        /// Human-readable error message or raw response body.
        message: String,
    },

    /// A status code outside the classified set.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Raw response body, surfaced to the user.
        body: String,
    },

    /// The configured model has no pricing entry. Raised only when the
    /// cost summary is computed, never mid-conversation.
    UnknownModelPricing {
        /// The model identifier that failed lookup.
        model: String,
    },

    /// Error during JSON or YAML serialization/deserialization.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// I/O error.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// HTTP client error that is neither a timeout nor a connection
    /// failure.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Configuration error (missing or invalid config source).
    Config {
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }

    /// Creates a new rate limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Error::RateLimit {
            message: message.into(),
        }
    }

    /// Creates a new service unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Error::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new context-length error, with structured detail when the
    /// service message could be parsed.
    pub fn context_length_exceeded(overflow: Option<ContextOverflow>) -> Self {
        Error::ContextLengthExceeded { overflow }
    }

    /// Creates a new bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a new API error for an unclassified status code.
    pub fn api(status_code: u16, body: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            body: body.into(),
        }
    }

    /// Creates a new unknown-pricing error.
    pub fn unknown_model_pricing(model: impl Into<String>) -> Self {
        Error::UnknownModelPricing {
            model: model.into(),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Returns true if the conversation should be rolled back and the user
    /// re-prompted rather than the session terminated.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. }
                | Error::Timeout { .. }
                | Error::RateLimit { .. }
                | Error::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error is related to authentication.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// Returns true if this error is related to rate limiting.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::RateLimit { .. })
    }

    /// Returns true if this error is a context-length violation.
    pub fn is_context_length_exceeded(&self) -> bool {
        matches!(self, Error::ContextLengthExceeded { .. })
    }

    /// Returns true if this error is a bad request.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::BadRequest { .. })
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Authentication { message } => {
                write!(f, "Authentication error: {message}")
            }
            Error::RateLimit { message } => {
                write!(f, "Rate limit exceeded: {message}")
            }
            Error::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {message}")
            }
            Error::ContextLengthExceeded { overflow } => match overflow {
                Some(overflow) => write!(
                    f,
                    "Maximum context length ({}) exceeded. Try reducing {} tokens from the {} sent",
                    overflow.max_tokens,
                    overflow.excess(),
                    overflow.sent_tokens,
                ),
                None => write!(f, "Maximum context length exceeded"),
            },
            Error::BadRequest { message } => {
                write!(f, "Invalid request: {message}")
            }
            Error::Api { status_code, body } => {
                write!(f, "Unknown error, status code {status_code}: {body}")
            }
            Error::UnknownModelPricing { model } => {
                write!(f, "No pricing configured for model: {model}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Config { message } => {
                write!(f, "Configuration error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source.as_ref()),
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::serialization(format!("YAML error: {err}"), Some(Box::new(err)))
    }
}

/// A specialized Result type for converse operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_excess() {
        let overflow = ContextOverflow::new(4096, 4500);
        assert_eq!(overflow.excess(), 404);
    }

    #[test]
    fn overflow_excess_saturates() {
        let overflow = ContextOverflow::new(4096, 100);
        assert_eq!(overflow.excess(), 0);
    }

    #[test]
    fn recoverable_kinds() {
        assert!(Error::connection("refused", None).is_recoverable());
        assert!(Error::timeout("timed out", Some(60.0)).is_recoverable());
        assert!(Error::rate_limit("slow down").is_recoverable());
        assert!(Error::service_unavailable("overloaded").is_recoverable());
    }

    #[test]
    fn fatal_kinds() {
        assert!(!Error::authentication("bad key").is_recoverable());
        assert!(!Error::context_length_exceeded(None).is_recoverable());
        assert!(!Error::bad_request("nope").is_recoverable());
        assert!(!Error::api(418, "teapot").is_recoverable());
        assert!(!Error::unknown_model_pricing("gpt-9").is_recoverable());
    }

    #[test]
    fn context_length_display_with_detail() {
        let err = Error::context_length_exceeded(Some(ContextOverflow::new(4096, 4500)));
        assert_eq!(
            err.to_string(),
            "Maximum context length (4096) exceeded. Try reducing 404 tokens from the 4500 sent"
        );
    }

    #[test]
    fn context_length_display_without_detail() {
        let err = Error::context_length_exceeded(None);
        assert_eq!(err.to_string(), "Maximum context length exceeded");
    }
}
