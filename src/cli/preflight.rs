//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{KursError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Asking questions requires both API keys.
    Query,
    /// Direct search only needs embeddings.
    Search,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Query => {
            check_env("ANTHROPIC_API_KEY")?;
            check_env("OPENAI_API_KEY")?;
        }
        Operation::Search => {
            check_env("OPENAI_API_KEY")?;
        }
    }
    Ok(())
}

/// Check that an API key environment variable is set and non-empty.
fn check_env(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(()),
        _ => Err(KursError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}
