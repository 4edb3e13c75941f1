//! Vector store abstraction for Kurs.
//!
//! Provides trait-based interfaces for the retrieval collaborators: the
//! chunk-level similarity search and the course catalog.

mod memory;

pub use memory::{CorpusStats, MemoryVectorStore};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata attached to one indexed content chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Title of the course this chunk belongs to.
    pub course_title: String,
    /// Lesson number within the course, if the chunk is lesson-scoped.
    pub lesson_number: Option<u32>,
    /// Order of this chunk within its course.
    pub chunk_index: usize,
}

/// Results of a similarity search.
///
/// `documents`, `metadata` and `distances` are always equal-length and
/// index-aligned. Search failures are carried in-band via `error` rather
/// than raised, so capabilities can surface them as tool output.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub distances: Vec<f32>,
    pub error: Option<String>,
}

impl SearchResults {
    /// Create an empty result set carrying an error message.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Whether the result set contains no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// One lesson inside a course's serialized lesson list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonEntry {
    pub lesson_number: u32,
    pub lesson_title: String,
    #[serde(default)]
    pub lesson_link: Option<String>,
}

/// Catalog metadata for one course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseMeta {
    /// Full course title.
    pub title: String,
    /// Link to the course page.
    pub course_link: Option<String>,
    /// JSON-serialized array of [`LessonEntry`].
    pub lessons_json: String,
}

impl CourseMeta {
    /// Decode the serialized lesson list, in stored order.
    pub fn lessons(&self) -> Result<Vec<LessonEntry>> {
        Ok(serde_json::from_str(&self.lessons_json)?)
    }
}

/// Trait for chunk-level retrieval implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Similarity search over course content, with optional course and
    /// lesson filters. Failures are reported in-band via the result set.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults;

    /// Resolve the link for a specific lesson, best effort.
    async fn get_lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String>;
}

/// Trait for course catalog lookups.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Resolve the best-matching course for a partial or fuzzy name.
    async fn resolve_course(&self, course_name: &str) -> Result<Option<CourseMeta>>;

    /// Titles of all catalogued courses.
    async fn course_titles(&self) -> Result<Vec<String>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
