//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod outline;
mod search;
mod serve;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use outline::run_outline;
pub use search::run_search;
pub use serve::run_serve;

use crate::anthropic::AnthropicClient;
use crate::config::{Prompts, Settings};
use crate::embedding::OpenAIEmbedder;
use crate::engine::QueryEngine;
use crate::error::{KursError, Result};
use crate::session::SessionManager;
use crate::vector_store::MemoryVectorStore;
use std::sync::Arc;

/// Build the vector store and load the corpus file if present.
pub(crate) async fn build_store(settings: &Settings) -> Result<Arc<MemoryVectorStore>> {
    let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding));
    let store = Arc::new(MemoryVectorStore::new(
        embedder,
        settings.search.max_results,
    ));

    let corpus = settings.corpus_path();
    if corpus.exists() {
        store.load_corpus(&corpus).await?;
    }

    Ok(store)
}

/// Build a fully wired query engine.
pub(crate) async fn build_engine(
    settings: &Settings,
    model_override: Option<&str>,
) -> Result<(QueryEngine, Arc<MemoryVectorStore>)> {
    let store = build_store(settings).await?;

    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .map_err(|_| KursError::Config("ANTHROPIC_API_KEY not set".to_string()))?;
    let client = Arc::new(AnthropicClient::with_host(
        &api_key,
        &settings.anthropic.host,
    ));

    let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
    let model = model_override.unwrap_or(&settings.anthropic.model);
    let sessions = Arc::new(SessionManager::new(settings.session.max_history));

    let engine = QueryEngine::new(
        client,
        model,
        &prompts.qa.system,
        store.clone(),
        store.clone(),
        sessions,
    );

    Ok((engine, store))
}
