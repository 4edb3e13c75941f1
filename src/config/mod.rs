//! Configuration management for Kurs.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts};
pub use settings::{
    AnthropicSettings, EmbeddingSettings, GeneralSettings, PromptSettings, SearchSettings,
    SessionSettings, Settings,
};
