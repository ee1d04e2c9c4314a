//! Generation backend backed by [`chat_client`].

use async_trait::async_trait;
use chat_client::{ChatClient, ChatError};
use std::time::Duration;

use crate::error::{BackendError, BackendResult};
use crate::traits::backend::GenerationBackend;

/// One model served through an OpenAI-compatible endpoint.
pub struct ChatBackend {
    client: ChatClient,
    model: String,
}

impl ChatBackend {
    pub fn new(client: ChatClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// One backend per model, in the given order, sharing a client.
    pub fn candidates(client: &ChatClient, models: &[String]) -> Vec<Self> {
        models
            .iter()
            .map(|m| Self::new(client.clone(), m.clone()))
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for ChatBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, timeout: Duration) -> BackendResult<String> {
        self.client
            .generate(&self.model, prompt, timeout)
            .await
            .map_err(|e| match e {
                ChatError::Timeout(after) => BackendError::Timeout(after),
                other => BackendError::Call(other.to_string()),
            })
    }
}
