//! Direct search command (retrieval without answer generation).

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::VectorStore;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    course: Option<String>,
    lesson: Option<u32>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store = super::build_store(&settings).await?;

    let spinner = Output::spinner("Searching...");
    let results = store.search(query, course.as_deref(), lesson).await;
    spinner.finish_and_clear();

    if let Some(error) = results.error {
        Output::error(&error);
        return Ok(());
    }

    if results.is_empty() {
        Output::info("No matching content found.");
        return Ok(());
    }

    Output::header(&format!("Results ({})", results.documents.len()));
    for ((doc, meta), distance) in results
        .documents
        .iter()
        .zip(&results.metadata)
        .zip(&results.distances)
    {
        let label = match meta.lesson_number {
            Some(n) => format!("{} - Lesson {}", meta.course_title, n),
            None => meta.course_title.clone(),
        };
        Output::search_result(&label, *distance, doc);
    }

    Ok(())
}
