//! Kurs - Course Material Q&A
//!
//! A CLI tool for answering questions about course materials, combining
//! semantic retrieval with a tool-using conversational model.
//!
//! The name "Kurs" comes from the Norwegian/Scandinavian word for "course."
//!
//! # Overview
//!
//! Kurs allows you to:
//! - Ask questions about an indexed course corpus and get answers with citations
//! - Let the model decide when to search content or fetch a course outline
//! - Hold follow-up conversations with bounded session history
//! - Serve the same Q&A over a small HTTP API
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `anthropic` - Messages API wire types and client
//! - `agent` - Conversation driver with the bounded tool loop
//! - `tools` - Retrieval capabilities and the tool registry
//! - `vector_store` - Vector store and course catalog abstractions
//! - `embedding` - Embedding generation
//! - `session` - Conversation session tracking
//! - `engine` - Query orchestration
//!
//! # Example
//!
//! ```rust,no_run
//! use kurs::anthropic::AnthropicClient;
//! use kurs::config::{Prompts, Settings};
//! use kurs::embedding::OpenAIEmbedder;
//! use kurs::engine::QueryEngine;
//! use kurs::session::SessionManager;
//! use kurs::vector_store::MemoryVectorStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let prompts = Prompts::load(None)?;
//!
//!     let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding));
//!     let store = Arc::new(MemoryVectorStore::new(embedder, settings.search.max_results));
//!     store.load_corpus(&settings.corpus_path()).await?;
//!
//!     let client = Arc::new(AnthropicClient::new(&std::env::var("ANTHROPIC_API_KEY")?));
//!     let sessions = Arc::new(SessionManager::new(settings.session.max_history));
//!
//!     let engine = QueryEngine::new(
//!         client,
//!         &settings.anthropic.model,
//!         &prompts.qa.system,
//!         store.clone(),
//!         store,
//!         sessions,
//!     );
//!
//!     let response = engine.query("What does lesson 1 cover?", None).await?;
//!     println!("{}", response.format_for_display());
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod anthropic;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod session;
pub mod tools;
pub mod vector_store;

pub use error::{KursError, Result};
