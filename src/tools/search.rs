//! Course content search capability.

use super::{SourceList, SourceRecord, Tool, ToolDefinition};
use crate::error::{KursError, Result};
use crate::vector_store::{ChunkMetadata, VectorStore};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Arguments the model supplies for a content search.
#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default)]
    lesson_number: Option<u32>,
}

/// Searches course content with optional course and lesson filters.
///
/// Each execution overwrites the shared citation list with one record per
/// matched document.
pub struct CourseSearchTool {
    store: Arc<dyn VectorStore>,
    sources: SourceList,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn VectorStore>, sources: SourceList) -> Self {
        Self { store, sources }
    }

    /// Render matches as labeled blocks and record their citations.
    async fn format_results(&self, documents: &[String], metadata: &[ChunkMetadata]) -> String {
        let mut blocks = Vec::with_capacity(documents.len());
        let mut records = Vec::with_capacity(documents.len());

        for (doc, meta) in documents.iter().zip(metadata) {
            let label = match meta.lesson_number {
                Some(n) => format!("{} - Lesson {}", meta.course_title, n),
                None => meta.course_title.clone(),
            };

            blocks.push(format!("[{}]\n{}", label, doc));

            let link = match meta.lesson_number {
                Some(n) => self.store.get_lesson_link(&meta.course_title, n).await,
                None => None,
            };
            records.push(SourceRecord { label, link });
        }

        self.sources.replace(records);
        blocks.join("\n\n")
    }
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_course_content".to_string(),
            description: "Search course materials with smart course name matching and lesson filtering".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let args: SearchArgs = serde_json::from_value(args)
            .map_err(|e| KursError::Tool(format!("Invalid search arguments: {}", e)))?;

        let results = self
            .store
            .search(
                &args.query,
                args.course_name.as_deref(),
                args.lesson_number,
            )
            .await;

        // Store-level failures surface verbatim as the tool's output,
        // regardless of any documents present.
        if let Some(error) = results.error {
            return Ok(error);
        }

        if results.is_empty() {
            let mut message = String::from("No relevant content found");
            if let Some(course) = &args.course_name {
                message.push_str(&format!(" in course '{}'", course));
            }
            if let Some(lesson) = args.lesson_number {
                message.push_str(&format!(" in lesson {}", lesson));
            }
            message.push('.');
            return Ok(message);
        }

        Ok(self
            .format_results(&results.documents, &results.metadata)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::SearchResults;
    use std::sync::Mutex;

    /// Store stub returning a canned result set and recording calls.
    struct StubStore {
        results: Mutex<Option<SearchResults>>,
        lesson_link: Option<String>,
        calls: Mutex<Vec<(String, Option<String>, Option<u32>)>>,
    }

    impl StubStore {
        fn returning(results: SearchResults) -> Self {
            Self {
                results: Mutex::new(Some(results)),
                lesson_link: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_lesson_link(mut self, link: &str) -> Self {
            self.lesson_link = Some(link.to_string());
            self
        }
    }

    #[async_trait]
    impl VectorStore for StubStore {
        async fn search(
            &self,
            query: &str,
            course_name: Option<&str>,
            lesson_number: Option<u32>,
        ) -> SearchResults {
            self.calls.lock().unwrap().push((
                query.to_string(),
                course_name.map(String::from),
                lesson_number,
            ));
            self.results.lock().unwrap().take().unwrap_or_default()
        }

        async fn get_lesson_link(&self, _course: &str, _lesson: u32) -> Option<String> {
            self.lesson_link.clone()
        }
    }

    fn single_result() -> SearchResults {
        SearchResults {
            documents: vec!["Intro text".to_string()],
            metadata: vec![ChunkMetadata {
                course_title: "A".to_string(),
                lesson_number: Some(1),
                chunk_index: 0,
            }],
            distances: vec![0.1],
            error: None,
        }
    }

    #[tokio::test]
    async fn test_formats_match_and_tracks_source() {
        let store = Arc::new(StubStore::returning(single_result()).with_lesson_link("http://example.com/lesson"));
        let sources = SourceList::default();
        let tool = CourseSearchTool::new(store, sources.clone());

        let output = tool
            .execute(json!({"query": "intro"}))
            .await
            .unwrap();

        assert!(output.contains("[A - Lesson 1]"));
        assert!(output.contains("Intro text"));

        let records = sources.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "A - Lesson 1");
        assert_eq!(records[0].link.as_deref(), Some("http://example.com/lesson"));
    }

    #[tokio::test]
    async fn test_passes_filters_to_store() {
        let store = Arc::new(StubStore::returning(single_result()));
        let tool = CourseSearchTool::new(store.clone(), SourceList::default());

        tool.execute(json!({
            "query": "advanced topic",
            "course_name": "Full Course",
            "lesson_number": 5
        }))
        .await
        .unwrap();

        let calls = store.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (
                "advanced topic".to_string(),
                Some("Full Course".to_string()),
                Some(5)
            )
        );
    }

    #[tokio::test]
    async fn test_error_returned_verbatim_even_with_documents() {
        let mut results = single_result();
        results.error = Some("db down".to_string());
        let store = Arc::new(StubStore::returning(results));
        let tool = CourseSearchTool::new(store, SourceList::default());

        let output = tool.execute(json!({"query": "any"})).await.unwrap();
        assert_eq!(output, "db down");
    }

    #[tokio::test]
    async fn test_empty_results_name_applied_filters() {
        let store = Arc::new(StubStore::returning(SearchResults::default()));
        let tool = CourseSearchTool::new(store, SourceList::default());

        let output = tool
            .execute(json!({"query": "x", "course_name": "MCP", "lesson_number": 3}))
            .await
            .unwrap();

        assert_eq!(output, "No relevant content found in course 'MCP' in lesson 3.");
    }

    #[tokio::test]
    async fn test_empty_results_without_filters() {
        let store = Arc::new(StubStore::returning(SearchResults::default()));
        let tool = CourseSearchTool::new(store, SourceList::default());

        let output = tool.execute(json!({"query": "x"})).await.unwrap();
        assert_eq!(output, "No relevant content found.");
    }

    #[tokio::test]
    async fn test_multiple_matches_overwrite_sources() {
        let results = SearchResults {
            documents: vec!["Content 1".to_string(), "Content 2".to_string()],
            metadata: vec![
                ChunkMetadata {
                    course_title: "Course A".to_string(),
                    lesson_number: Some(1),
                    chunk_index: 0,
                },
                ChunkMetadata {
                    course_title: "Course B".to_string(),
                    lesson_number: None,
                    chunk_index: 3,
                },
            ],
            distances: vec![0.3, 0.4],
            error: None,
        };
        let store = Arc::new(StubStore::returning(results));
        let sources = SourceList::default();
        let tool = CourseSearchTool::new(store, sources.clone());

        let output = tool.execute(json!({"query": "test"})).await.unwrap();

        // Lesson-less match gets a bare course header.
        assert!(output.contains("[Course B]\nContent 2"));

        let records = sources.snapshot();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].label, "Course B");
        assert!(records[1].link.is_none());
    }

    #[test]
    fn test_definition_shape() {
        let store = Arc::new(StubStore::returning(SearchResults::default()));
        let tool = CourseSearchTool::new(store, SourceList::default());

        let definition = tool.definition();
        assert_eq!(definition.name, "search_course_content");
        assert_eq!(definition.input_schema["type"], "object");
        assert!(definition.input_schema["properties"]["query"].is_object());
        assert_eq!(definition.input_schema["required"][0], "query");
    }
}
