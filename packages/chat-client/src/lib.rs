//! Minimal OpenAI-compatible chat completions client.
//!
//! Any provider exposing `POST {base}/chat/completions` works: OpenAI itself,
//! OpenRouter, or a local gateway fronting several model families. The client
//! knows nothing about reviews; it turns a prompt into text or an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_client::ChatClient;
//! use std::time::Duration;
//!
//! let client = ChatClient::from_env()?;
//! let text = client.generate("gpt-4", "Hello!", Duration::from_secs(30)).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{ChatError, Result};
pub use types::{ChatRequest, Message};

use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
pub struct ChatClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from `CHAT_API_KEY`, honouring `CHAT_BASE_URL` when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CHAT_API_KEY")
            .map_err(|_| ChatError::Config("CHAT_API_KEY not set".into()))?;
        let client = Self::new(api_key);
        Ok(match std::env::var("CHAT_BASE_URL") {
            Ok(url) if !url.is_empty() => client.with_base_url(url),
            _ => client,
        })
    }

    /// Set a custom base URL (gateways, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Single-turn generation: one user message in, assistant text out.
    pub async fn generate(&self, model: &str, prompt: &str, timeout: Duration) -> Result<String> {
        let request = ChatRequest::new(model).message(Message::user(prompt));
        self.chat_completion(request, timeout).await
    }

    /// Chat completion bounded by `timeout`.
    pub async fn chat_completion(&self, request: ChatRequest, timeout: Duration) -> Result<String> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(model = %request.model, error = %e, "Chat request failed");
                if e.is_timeout() {
                    ChatError::Timeout(timeout)
                } else {
                    ChatError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(model = %request.model, status = %status, error = %error_text, "Chat API error");
            return Err(ChatError::Api(format!("{}: {}", status, error_text)));
        }

        let raw: types::ChatResponseRaw = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::Timeout(timeout)
            } else {
                ChatError::Parse(e.to_string())
            }
        })?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ChatError::Parse("No choices in response".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ChatClient::new("sk-test").with_base_url("https://gateway.local/v1/");
        assert_eq!(client.base_url(), "https://gateway.local/v1");
        assert_eq!(client.api_key, "sk-test");
    }

    #[tokio::test]
    async fn unreachable_gateway_is_network_error() {
        let client = ChatClient::new("sk-test").with_base_url("http://127.0.0.1:1");
        let err = client
            .generate("gpt-4", "hi", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Network(_) | ChatError::Timeout(_)));
    }
}
