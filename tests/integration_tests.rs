//! Integration tests for the converse library.
//! The live round-trip test requires an API key in the environment.

#[cfg(test)]
mod tests {
    use converse::chat::{ChatConfig, ChatSession, Turn};
    use converse::{OpenAi, Outcome, classify};

    fn chat_config(api_key: Option<String>) -> ChatConfig {
        ChatConfig {
            api_key,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 1.0,
            max_tokens: Some(16),
            markdown: false,
            multiline: false,
        }
    }

    #[test]
    fn classification_table() {
        let ok_body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hi"}}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1}
        }"#;
        assert!(classify(200, ok_body).is_success());
        assert!(classify(400, r#"{"error": {"code": "x", "message": "y"}}"#).is_fatal());
        assert!(classify(401, "{}").is_fatal());
        assert!(classify(429, "{}").is_recoverable());
        assert!(classify(502, "{}").is_recoverable());
        assert!(classify(503, "{}").is_recoverable());
        assert!(classify(418, "{}").is_fatal());
    }

    #[tokio::test]
    async fn connection_failure_is_recoverable_and_rolls_back() {
        // Nothing listens here; the send must fail at the transport level
        // and leave the conversation exactly as it was.
        let client = OpenAi::with_options(
            Some("test-key".to_string()),
            Some("http://127.0.0.1:9".to_string()),
            Some(std::time::Duration::from_secs(1)),
        )
        .expect("client should build");
        let mut session = ChatSession::new(client, chat_config(Some("test-key".to_string())));

        let turn = session.send("hello").await;
        assert!(matches!(turn, Turn::Retry(_)));
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.total_tokens(), 0);
    }

    #[tokio::test]
    async fn live_round_trip() {
        // This test requires OPENAI_API_KEY to be set
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: OPENAI_API_KEY not set");
            return;
        }

        let client = OpenAi::new(api_key.clone()).expect("Failed to create client");
        let messages = vec![converse::Message::user("Say 'test passed'")];
        let request = converse::ChatRequest {
            model: "gpt-3.5-turbo",
            temperature: 0.0,
            messages: &messages,
            max_tokens: Some(16),
        };

        let outcome = client.send(&request).await;
        match outcome {
            Outcome::Success { usage, .. } => {
                assert!(usage.prompt_tokens > 0);
            }
            other => panic!("Request should succeed with a valid API key: {other:?}"),
        }
    }
}
