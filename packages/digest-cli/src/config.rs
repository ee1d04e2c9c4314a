use anyhow::{Context, Result};
use dotenvy::dotenv;
use marketplace_client::Endpoints;
use review_digest::DigestConfig;
use std::env;
use std::time::Duration;

const DEFAULT_MODELS: &str = "gpt-3.5-turbo,gpt-4,claude-v2,gemini-pro";

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub chat_api_key: String,
    pub chat_base_url: Option<String>,
    /// Backend candidates, tried in this order
    pub models: Vec<String>,
    pub backend_timeout: Duration,
    pub endpoints: Endpoints,
    pub marketplace_timeout: Duration,
    pub starting_attempts: u32,
}

impl CliConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Endpoints::default();

        Ok(Self {
            chat_api_key: env::var("CHAT_API_KEY").context("CHAT_API_KEY must be set")?,
            chat_base_url: env::var("CHAT_BASE_URL").ok().filter(|v| !v.is_empty()),
            models: parse_models(
                &env::var("DIGEST_MODELS").unwrap_or_else(|_| DEFAULT_MODELS.to_string()),
            )?,
            backend_timeout: Duration::from_secs(
                env::var("DIGEST_BACKEND_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("DIGEST_BACKEND_TIMEOUT_SECS must be a valid number")?,
            ),
            endpoints: Endpoints {
                card: env::var("MARKETPLACE_CARD_URL").unwrap_or(defaults.card),
                feedback_primary: env::var("MARKETPLACE_FEEDBACK_PRIMARY")
                    .unwrap_or(defaults.feedback_primary),
                feedback_secondary: env::var("MARKETPLACE_FEEDBACK_SECONDARY")
                    .unwrap_or(defaults.feedback_secondary),
                search: env::var("MARKETPLACE_SEARCH_URL").unwrap_or(defaults.search),
            },
            marketplace_timeout: Duration::from_secs(
                env::var("MARKETPLACE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .context("MARKETPLACE_TIMEOUT_SECS must be a valid number")?,
            ),
            starting_attempts: env::var("DIGEST_STARTING_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("DIGEST_STARTING_ATTEMPTS must be a valid number")?,
        })
    }

    pub fn digest_config(&self) -> DigestConfig {
        DigestConfig::default()
            .with_backend_timeout(self.backend_timeout)
            .with_mirror_timeout(self.marketplace_timeout)
    }
}

fn parse_models(raw: &str) -> Result<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect();
    anyhow::ensure!(!models.is_empty(), "DIGEST_MODELS must name at least one model");
    Ok(models)
}
