//! Wires the marketplace and chat adapters into a digest service.

use anyhow::{Context, Result};
use chat_client::ChatClient;
use marketplace_client::MarketplaceClient;
use review_digest::{
    adapters::{ChatBackend, MarketplaceCatalog, MarketplaceMirror},
    AnalysisCache, ComparisonSessions, DigestPipeline, DigestService, GenerationBackend,
    MemoryLedger,
};
use std::sync::Arc;

use crate::config::CliConfig;

pub struct App {
    pub service: DigestService,
    pub sessions: ComparisonSessions,
    pub ledger: Arc<MemoryLedger>,
}

pub fn build_app(config: &CliConfig) -> Result<App> {
    let digest_config = config.digest_config();

    let marketplace = MarketplaceClient::with_config(config.endpoints.clone(), config.marketplace_timeout)
        .context("Failed to build marketplace HTTP client")?;
    let catalog = Arc::new(MarketplaceCatalog::new(marketplace.clone()));
    let (primary, secondary) = MarketplaceMirror::pair(marketplace);

    let mut chat = ChatClient::new(config.chat_api_key.clone());
    if let Some(url) = &config.chat_base_url {
        chat = chat.with_base_url(url.clone());
    }
    let backends: Vec<Arc<dyn GenerationBackend>> = ChatBackend::candidates(&chat, &config.models)
        .into_iter()
        .map(|b| Arc::new(b) as Arc<dyn GenerationBackend>)
        .collect();

    let cache = Arc::new(AnalysisCache::new(digest_config.cache_capacity));
    let pipeline = Arc::new(DigestPipeline::assemble(
        &digest_config,
        catalog.clone(),
        Arc::new(primary),
        Arc::new(secondary),
        backends,
        cache,
    ));

    let ledger = Arc::new(MemoryLedger::new(config.starting_attempts));
    let service = DigestService::new(
        pipeline,
        catalog,
        ledger.clone(),
        ledger.clone(),
        digest_config.search_limit,
    );
    let sessions = ComparisonSessions::new(digest_config.session_timeout, digest_config.domain_markers);

    tracing::info!(models = ?config.models, "Digest service ready");

    Ok(App {
        service,
        sessions,
        ledger,
    })
}
