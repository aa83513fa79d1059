// src/answer/chat.rs
use crate::answer::Answerer;
use crate::documents::Document;
use crate::utils::error::AnswerError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

// --- Constants ---
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const INITIAL_BACKOFF_MS: u64 = 750;
const MAX_BACKOFF_MS: u64 = 5_000;

const SYSTEM_PROMPT: &str = "You answer questions about a document the user uploaded. \
Use only the content provided. Quote monetary values exactly as they appear. \
If the answer is not in the content, say so.";

/// Connection settings for an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_retries: usize,
    pub prompt_char_limit: usize,
}

/// Remote answer backend.
pub struct ChatAnswerer {
    client: reqwest::Client,
    settings: ChatSettings,
}

impl ChatAnswerer {
    pub fn new(settings: ChatSettings) -> Result<Self, AnswerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, settings })
    }

    fn request_body(&self, document: &Document, question: &str) -> Value {
        let content = document.content_for_prompt(self.settings.prompt_char_limit);
        json!({
            "model": self.settings.model,
            "temperature": 0.2,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!("Document ({}):\n{}\n\nQuestion: {}", document.kind(), content, question)
                }
            ]
        })
    }
}

#[async_trait]
impl Answerer for ChatAnswerer {
    fn name(&self) -> &'static str {
        "chat completion"
    }

    async fn answer(&self, document: &Document, question: &str) -> Result<String, AnswerError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AnswerError::Unavailable("OPENAI_API_KEY is not set".to_string()))?;

        let url = format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'));
        let body = self.request_body(document, question);
        let max_attempts = self.settings.max_retries.max(1);
        let mut delay_ms = INITIAL_BACKOFF_MS;
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            tracing::info!("Sending chat request to {} (attempt {})", url, attempt);

            let response = self.client.post(&url).bearer_auth(api_key).json(&body).send().await?;

            let status = response.status();
            if status.is_success() {
                let payload: Value = response.json().await?;
                return parse_completion(&payload);
            }

            tracing::warn!("Chat endpoint returned {} on attempt {}", status, attempt);
            if !is_retryable(status) || attempt >= max_attempts {
                return Err(AnswerError::Http(status));
            }

            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            delay_ms = (delay_ms * 7 / 4).min(MAX_BACKOFF_MS);
        }
    }
}

/// Rate limits and server errors are worth another attempt; client errors are not.
fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Pulls `choices[0].message.content` out of a chat-completion response.
fn parse_completion(payload: &Value) -> Result<String, AnswerError> {
    let choices = payload
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| AnswerError::Parse("missing 'choices' array".to_string()))?;

    let content = choices
        .first()
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if content.is_empty() {
        return Err(AnswerError::NoAnswer);
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn settings(api_key: Option<&str>) -> ChatSettings {
        ChatSettings {
            api_key: api_key.map(str::to_string),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: 3,
            prompt_char_limit: 100,
        }
    }

    #[test]
    fn test_missing_key_is_unavailable_without_network() {
        let answerer = ChatAnswerer::new(settings(None)).unwrap();
        let doc = Document::Pdf("Frango R$ 8,99".to_string());
        let result = block_on(answerer.answer(&doc, "frango"));
        assert!(matches!(result, Err(AnswerError::Unavailable(_))));

        let blank = ChatAnswerer::new(settings(Some("  "))).unwrap();
        assert!(matches!(block_on(blank.answer(&doc, "frango")), Err(AnswerError::Unavailable(_))));
    }

    #[test]
    fn test_request_body_carries_limited_content() {
        let answerer = ChatAnswerer::new(settings(Some("k"))).unwrap();
        let doc = Document::Pdf("x".repeat(500));
        let body = answerer.request_body(&doc, "qual o total?");
        assert_eq!(body["model"], DEFAULT_MODEL);
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains(&"x".repeat(100)));
        assert!(!user.contains(&"x".repeat(101)));
        assert!(user.ends_with("Question: qual o total?"));
    }

    #[test]
    fn test_parse_completion() {
        let ok = json!({ "choices": [ { "message": { "role": "assistant", "content": " R$ 8,99 \n" } } ] });
        assert_eq!(parse_completion(&ok).unwrap(), "R$ 8,99");

        let empty = json!({ "choices": [] });
        assert!(matches!(parse_completion(&empty), Err(AnswerError::NoAnswer)));

        let garbage = json!({ "error": { "message": "bad" } });
        assert!(matches!(parse_completion(&garbage), Err(AnswerError::Parse(_))));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(reqwest::StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(reqwest::StatusCode::UNAUTHORIZED));
    }
}
