//! Interactive chat command with session history.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Query) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let (engine, _store) = super::build_engine(&settings, model.as_deref()).await?;
    let sessions = engine.sessions();
    let mut session_id = sessions.create_session();

    println!("\n{}", style("Kurs Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask about your courses, or 'exit' to quit. Use 'clear' to reset conversation.")
            .dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            sessions.clear_session(session_id);
            session_id = sessions.create_session();
            Output::info("Conversation history cleared.");
            continue;
        }

        match engine.query(input, Some(session_id)).await {
            Ok(response) => {
                println!("\n{} {}\n", style("Kurs:").cyan().bold(), response.answer);
                for source in &response.sources {
                    Output::source(&source.label, source.link.as_deref());
                }
                if !response.sources.is_empty() {
                    println!();
                }
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
