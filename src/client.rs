//! HTTP client for the chat-completion endpoint.

use std::env;
use std::time::Duration;

use serde::Serialize;

use crate::classify::{Outcome, classify};
use crate::error::{Error, Result};
use crate::types::Message;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variable consulted when no API key is supplied explicitly.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Request body for one chat-completion call.
///
/// Borrows the conversation snapshot; building a request never clones or
/// mutates the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Target model identifier.
    pub model: &'a str,

    /// Sampling temperature.
    pub temperature: f64,

    /// The full message sequence, replayed verbatim.
    pub messages: &'a [Message],

    /// Optional bound on output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Client for an OpenAI-style chat-completion API.
#[derive(Debug, Clone)]
pub struct OpenAi {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAi {
    /// Create a new client.
    ///
    /// The API key can be provided directly or read from the OPENAI_API_KEY
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::authentication(
                    "API key not provided and OPENAI_API_KEY environment variable not set",
                )
            })?,
        };

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout,
        })
    }

    /// Send one request and classify the result.
    ///
    /// Connection and timeout failures come back as recoverable outcomes so
    /// the caller can roll back the speculative user message and let the
    /// user retry. On transport success the status code and body are handed
    /// to the classifier. This method performs no state mutation; committing
    /// or rolling back the conversation is the caller's job.
    pub async fn send(&self, request: &ChatRequest<'_>) -> Outcome {
        let url = format!("{}/chat/completions", self.base_url);

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return if e.is_timeout() {
                    Outcome::Recoverable(Error::timeout(
                        format!("request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    ))
                } else if e.is_connect() {
                    Outcome::Recoverable(Error::connection(
                        format!("connection error: {}", e),
                        Some(Box::new(e)),
                    ))
                } else {
                    Outcome::Fatal(Error::http_client(
                        format!("request failed: {}", e),
                        Some(Box::new(e)),
                    ))
                };
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Outcome::Fatal(Error::http_client(
                    format!("failed to read response body: {}", e),
                    Some(Box::new(e)),
                ));
            }
        };

        classify(status, &body)
    }
}
