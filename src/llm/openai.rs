//! OpenAI-compatible chat completions client
//!
//! Speaks the `/chat/completions` wire format over HTTPS, so it works
//! against api.openai.com and any compatible endpoint (a local proxy,
//! vLLM, ...) via `model.base_url`.

use crate::config::ModelConfig;
use crate::error::{LlmError, LlmResult};
use crate::llm::CompletionModel;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Chat-completions client bound to one model identity
pub struct OpenAiModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiModel {
    /// Build a client from config. The request timeout is set on the HTTP
    /// client itself so every call gets the same explicit bound.
    pub fn new(config: &ModelConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

impl CompletionModel for OpenAiModel {
    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(map_transport_error)?;
        let choice = parsed.choices.into_iter().next().ok_or(LlmError::EmptyCompletion)?;
        if let Some(reason) = &choice.finish_reason {
            if reason == "length" {
                debug!("completion truncated at max_tokens");
            }
        }

        match choice.message.content {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(LlmError::EmptyCompletion),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_model() -> OpenAiModel {
        OpenAiModel::new(&ModelConfig {
            api_key: "sk-test".to_string(),
            base_url: "https://api.openai.com/v1/".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 256,
            request_timeout_secs: 10,
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let model = test_model();
        assert_eq!(model.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_request_body_shape() {
        let model = test_model();
        let body = model.request_body("hello");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_parse_chat_response() {
        let raw = r#"{
            "choices": [
                {"message": {"content": "SELECT 1;"}, "finish_reason": "stop"}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("SELECT 1;")
        );
    }

    #[test]
    fn test_parse_chat_response_null_content() {
        let raw = r#"{"choices": [{"message": {"content": null}, "finish_reason": "stop"}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
