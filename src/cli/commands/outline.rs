//! Outline command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::tools::{CourseOutlineTool, Tool};
use anyhow::Result;
use serde_json::json;

/// Run the outline command.
pub async fn run_outline(course: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store = super::build_store(&settings).await?;
    let tool = CourseOutlineTool::new(store);

    let output = tool.execute(json!({ "course_name": course })).await?;
    println!("\n{}\n", output);

    Ok(())
}
