//! CLI module for Kurs.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kurs - Course Material Q&A
///
/// Ask questions about indexed course materials and get AI-generated
/// answers with citations. The name "Kurs" comes from the
/// Norwegian/Scandinavian word for "course."
#[derive(Parser, Debug)]
#[command(name = "kurs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about the course materials
    Ask {
        /// The question to ask
        question: String,

        /// Model to use for response generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session with conversation history
    Chat {
        /// Model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Search course content directly (no answer generation)
    Search {
        /// Search query
        query: String,

        /// Restrict results to one course (partial title works)
        #[arg(short = 'n', long)]
        course: Option<String>,

        /// Restrict results to one lesson number
        #[arg(short, long)]
        lesson: Option<u32>,
    },

    /// Show the outline of a course
    Outline {
        /// Course title (partial matches work)
        course: String,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
