//! Query orchestration for course-material Q&A.
//!
//! Wires the response generator, the retrieval tools and the session
//! store together. `query` returns the answer and its citations as one
//! value; the tool manager's citation list is read and cleared here so
//! callers never see stale sources.

use crate::agent::ResponseGenerator;
use crate::anthropic::ModelClient;
use crate::error::Result;
use crate::session::SessionManager;
use crate::tools::{CourseOutlineTool, CourseSearchTool, SourceRecord, ToolManager};
use crate::vector_store::{CourseCatalog, VectorStore};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// An answer with the citations that produced it.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceRecord>,
}

impl QueryResponse {
    /// Format the response for terminal display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!("\n{}", source.label));
                if let Some(link) = &source.link {
                    output.push_str(&format!("\n  {}", link));
                }
            }
        }

        output
    }
}

/// Orchestrates one query end to end.
pub struct QueryEngine {
    generator: ResponseGenerator,
    manager: ToolManager,
    sessions: Arc<SessionManager>,
}

impl QueryEngine {
    /// Build an engine with both retrieval capabilities registered.
    pub fn new(
        client: Arc<dyn ModelClient>,
        model: &str,
        system_prompt: &str,
        store: Arc<dyn VectorStore>,
        catalog: Arc<dyn CourseCatalog>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        let mut manager = ToolManager::new();
        manager.register(Arc::new(CourseSearchTool::new(store, manager.sources())));
        manager.register(Arc::new(CourseOutlineTool::new(catalog)));

        Self {
            generator: ResponseGenerator::new(client, model, system_prompt),
            manager,
            sessions,
        }
    }

    /// Session store shared with the surface layer.
    pub fn sessions(&self) -> Arc<SessionManager> {
        self.sessions.clone()
    }

    /// Answer a question, optionally within a session.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn query(
        &self,
        question: &str,
        session_id: Option<Uuid>,
    ) -> Result<QueryResponse> {
        info!("Processing query: {}", question);

        let prompt = format!("Answer this question about course materials: {}", question);
        let history = session_id.and_then(|id| self.sessions.get_history(id));
        let definitions = self.manager.get_tool_definitions();

        let answer = self
            .generator
            .generate(
                &prompt,
                history.as_deref(),
                Some(&definitions),
                Some(&self.manager),
            )
            .await?;

        // Collect citations and clear the shared list before returning,
        // so the next query starts clean.
        let sources = self.manager.get_last_sources();
        self.manager.reset_sources();

        if let Some(id) = session_id {
            self.sessions.add_exchange(id, question, &answer);
        }

        Ok(QueryResponse { answer, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anthropic::{ContentBlock, MessagesRequest, MessagesResponse, StopReason};
    use crate::error::KursError;
    use crate::vector_store::{ChunkMetadata, CourseMeta, SearchResults};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedModel {
        responses: Mutex<VecDeque<MessagesResponse>>,
        requests: Mutex<Vec<MessagesRequest>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<MessagesResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| KursError::Api("script exhausted".to_string()))
        }
    }

    struct StubStore;

    #[async_trait]
    impl VectorStore for StubStore {
        async fn search(
            &self,
            _query: &str,
            _course: Option<&str>,
            _lesson: Option<u32>,
        ) -> SearchResults {
            SearchResults {
                documents: vec!["Chunk content".to_string()],
                metadata: vec![ChunkMetadata {
                    course_title: "Course A".to_string(),
                    lesson_number: Some(1),
                    chunk_index: 0,
                }],
                distances: vec![0.2],
                error: None,
            }
        }

        async fn get_lesson_link(&self, _course: &str, _lesson: u32) -> Option<String> {
            None
        }
    }

    struct StubCatalog;

    #[async_trait]
    impl CourseCatalog for StubCatalog {
        async fn resolve_course(&self, _name: &str) -> Result<Option<CourseMeta>> {
            Ok(None)
        }

        async fn course_titles(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }
    }

    fn engine(client: Arc<ScriptedModel>) -> QueryEngine {
        QueryEngine::new(
            client,
            "test-model",
            "You answer questions about course materials.",
            Arc::new(StubStore),
            Arc::new(StubCatalog),
            Arc::new(SessionManager::new(2)),
        )
    }

    fn text_response(text: &str) -> MessagesResponse {
        MessagesResponse {
            content: vec![ContentBlock::Text {
                text: text.to_string(),
            }],
            stop_reason: Some(StopReason::EndTurn),
        }
    }

    fn search_tool_use() -> MessagesResponse {
        MessagesResponse {
            content: vec![ContentBlock::ToolUse {
                id: "toolu_1".to_string(),
                name: "search_course_content".to_string(),
                input: json!({"query": "content"}),
            }],
            stop_reason: Some(StopReason::ToolUse),
        }
    }

    #[tokio::test]
    async fn test_both_tools_registered() {
        let client = ScriptedModel::new(vec![]);
        let engine = engine(client);

        let names: Vec<String> = engine
            .manager
            .get_tool_definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["search_course_content", "get_course_outline"]);
    }

    #[tokio::test]
    async fn test_query_returns_answer_with_sources_and_resets() {
        let client = ScriptedModel::new(vec![search_tool_use(), text_response("The answer.")]);
        let engine = engine(client);

        let response = engine.query("What is in lesson 1?", None).await.unwrap();

        assert_eq!(response.answer, "The answer.");
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].label, "Course A - Lesson 1");

        // The side channel is drained before the call returns.
        assert!(engine.manager.get_last_sources().is_empty());
    }

    #[tokio::test]
    async fn test_query_without_tool_use_has_no_sources() {
        let client = ScriptedModel::new(vec![text_response("General knowledge answer.")]);
        let engine = engine(client);

        let response = engine.query("What is 2+2?", None).await.unwrap();
        assert!(response.sources.is_empty());
    }

    #[tokio::test]
    async fn test_session_history_reaches_next_query() {
        let client = ScriptedModel::new(vec![
            text_response("First answer."),
            text_response("Second answer."),
        ]);
        let engine = engine(client.clone());
        let session = engine.sessions().create_session();

        engine.query("first question", Some(session)).await.unwrap();
        engine.query("second question", Some(session)).await.unwrap();

        let requests = client.requests.lock().unwrap();
        assert!(!requests[0].system.contains("Previous conversation"));
        assert!(requests[1].system.contains("Previous conversation"));
        assert!(requests[1].system.contains("first question"));
        assert!(requests[1].system.contains("First answer."));
    }

    #[test]
    fn test_format_for_display_includes_sources() {
        let response = QueryResponse {
            answer: "Answer.".to_string(),
            sources: vec![SourceRecord {
                label: "Course A - Lesson 1".to_string(),
                link: Some("http://example.com/1".to_string()),
            }],
        };

        let display = response.format_for_display();
        assert!(display.contains("--- Sources ---"));
        assert!(display.contains("Course A - Lesson 1"));
        assert!(display.contains("http://example.com/1"));
    }
}
