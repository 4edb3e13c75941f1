//! In-memory vector store implementation.
//!
//! Holds course chunks and catalog entries with their embeddings and
//! serves searches with a cosine-similarity scan. Useful for testing and
//! corpora that fit in memory; not an index engine.

use super::{
    cosine_similarity, ChunkMetadata, CourseCatalog, CourseMeta, SearchResults, VectorStore,
};
use crate::embedding::Embedder;
use crate::error::{KursError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// One indexed content chunk.
struct StoredChunk {
    content: String,
    metadata: ChunkMetadata,
    embedding: Vec<f32>,
}

/// One catalogued course with its title embedding.
struct StoredCourse {
    meta: CourseMeta,
    embedding: Vec<f32>,
}

/// In-memory store backing both retrieval traits.
pub struct MemoryVectorStore {
    embedder: Arc<dyn Embedder>,
    chunks: RwLock<Vec<StoredChunk>>,
    courses: RwLock<Vec<StoredCourse>>,
    max_results: usize,
}

/// A course as it appears in a corpus file.
#[derive(Debug, Deserialize)]
struct CorpusCourse {
    title: String,
    #[serde(default)]
    course_link: Option<String>,
    #[serde(default)]
    lessons: Vec<super::LessonEntry>,
    chunks: Vec<CorpusChunk>,
}

#[derive(Debug, Deserialize)]
struct CorpusChunk {
    content: String,
    #[serde(default)]
    lesson_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CorpusFile {
    courses: Vec<CorpusCourse>,
}

/// Summary of a corpus load.
#[derive(Debug, Clone, Copy)]
pub struct CorpusStats {
    pub courses: usize,
    pub chunks: usize,
}

impl MemoryVectorStore {
    /// Create an empty store.
    pub fn new(embedder: Arc<dyn Embedder>, max_results: usize) -> Self {
        Self {
            embedder,
            chunks: RwLock::new(Vec::new()),
            courses: RwLock::new(Vec::new()),
            max_results,
        }
    }

    /// Add a course and its pre-chunked content, embedding both.
    pub async fn add_course(
        &self,
        meta: CourseMeta,
        chunks: Vec<(String, Option<u32>)>,
    ) -> Result<()> {
        let title_embedding = self.embedder.embed(&meta.title).await?;

        let texts: Vec<String> = chunks.iter().map(|(content, _)| content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(KursError::VectorStore(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let mut stored = self.chunks.write().unwrap();
        for (index, ((content, lesson_number), embedding)) in
            chunks.into_iter().zip(embeddings).enumerate()
        {
            stored.push(StoredChunk {
                content,
                metadata: ChunkMetadata {
                    course_title: meta.title.clone(),
                    lesson_number,
                    chunk_index: index,
                },
                embedding,
            });
        }
        drop(stored);

        self.courses.write().unwrap().push(StoredCourse {
            meta,
            embedding: title_embedding,
        });

        Ok(())
    }

    /// Load a prepared corpus file (courses with pre-chunked content).
    pub async fn load_corpus(&self, path: &Path) -> Result<CorpusStats> {
        let content = std::fs::read_to_string(path)?;
        let corpus: CorpusFile = serde_json::from_str(&content)?;

        let mut stats = CorpusStats {
            courses: 0,
            chunks: 0,
        };

        for course in corpus.courses {
            let meta = CourseMeta {
                title: course.title,
                course_link: course.course_link,
                lessons_json: serde_json::to_string(&course.lessons)?,
            };
            let chunks: Vec<(String, Option<u32>)> = course
                .chunks
                .into_iter()
                .map(|c| (c.content, c.lesson_number))
                .collect();

            stats.courses += 1;
            stats.chunks += chunks.len();
            self.add_course(meta, chunks).await?;
        }

        info!(
            "Loaded corpus: {} courses, {} chunks",
            stats.courses, stats.chunks
        );
        Ok(stats)
    }

    /// Best semantic match for a partial course name.
    async fn best_matching_title(&self, course_name: &str) -> Result<Option<String>> {
        let query_embedding = self.embedder.embed(course_name).await?;
        let courses = self.courses.read().unwrap();

        let best = courses
            .iter()
            .map(|c| (cosine_similarity(&query_embedding, &c.embedding), c))
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(best.map(|(_, c)| c.meta.title.clone()))
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults {
        // Resolve a fuzzy course name to a catalogued title before filtering.
        let course_filter = match course_name {
            Some(name) => match self.best_matching_title(name).await {
                Ok(Some(title)) => Some(title),
                Ok(None) => {
                    return SearchResults::from_error(format!(
                        "No course found matching '{}'",
                        name
                    ))
                }
                Err(e) => return SearchResults::from_error(e.to_string()),
            },
            None => None,
        };

        let query_embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => return SearchResults::from_error(e.to_string()),
        };

        let chunks = self.chunks.read().unwrap();
        let mut scored: Vec<(f32, &StoredChunk)> = chunks
            .iter()
            .filter(|c| match &course_filter {
                Some(title) => c.metadata.course_title == *title,
                None => true,
            })
            .filter(|c| match lesson_number {
                Some(n) => c.metadata.lesson_number == Some(n),
                None => true,
            })
            .map(|c| (cosine_similarity(&query_embedding, &c.embedding), c))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.max_results);

        debug!("Search returned {} chunks", scored.len());

        let mut results = SearchResults::default();
        for (score, chunk) in scored {
            results.documents.push(chunk.content.clone());
            results.metadata.push(chunk.metadata.clone());
            results.distances.push(1.0 - score);
        }
        results
    }

    async fn get_lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        let courses = self.courses.read().unwrap();
        let course = courses.iter().find(|c| c.meta.title == course_title)?;
        let lessons = course.meta.lessons().ok()?;
        lessons
            .into_iter()
            .find(|l| l.lesson_number == lesson_number)
            .and_then(|l| l.lesson_link)
    }
}

#[async_trait]
impl CourseCatalog for MemoryVectorStore {
    async fn resolve_course(&self, course_name: &str) -> Result<Option<CourseMeta>> {
        let title = match self.best_matching_title(course_name).await? {
            Some(title) => title,
            None => return Ok(None),
        };

        let courses = self.courses.read().unwrap();
        Ok(courses
            .iter()
            .find(|c| c.meta.title == title)
            .map(|c| c.meta.clone()))
    }

    async fn course_titles(&self) -> Result<Vec<String>> {
        let courses = self.courses.read().unwrap();
        Ok(courses.iter().map(|c| c.meta.title.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;

    /// Deterministic embedder: maps known phrases onto fixed axes.
    struct FakeEmbedder;

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(if lower.contains("python") {
                vec![1.0, 0.0, 0.0]
            } else if lower.contains("mcp") {
                vec![0.0, 1.0, 0.0]
            } else {
                vec![0.0, 0.0, 1.0]
            })
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    async fn seeded_store() -> MemoryVectorStore {
        let store = MemoryVectorStore::new(Arc::new(FakeEmbedder), 5);

        store
            .add_course(
                CourseMeta {
                    title: "Python Basics".to_string(),
                    course_link: Some("http://example.com/python".to_string()),
                    lessons_json: r#"[{"lesson_number":1,"lesson_title":"Variables","lesson_link":"http://example.com/python/1"}]"#.to_string(),
                },
                vec![
                    ("Python variables hold values.".to_string(), Some(1)),
                    ("Python functions take arguments.".to_string(), Some(2)),
                ],
            )
            .await
            .unwrap();

        store
            .add_course(
                CourseMeta {
                    title: "MCP Course".to_string(),
                    course_link: None,
                    lessons_json: "[]".to_string(),
                },
                vec![("MCP servers expose tools.".to_string(), Some(1))],
            )
            .await
            .unwrap();

        store
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = seeded_store().await;

        let results = store.search("python question", None, None).await;
        assert!(results.error.is_none());
        assert_eq!(results.documents.len(), 3);
        assert_eq!(results.metadata[0].course_title, "Python Basics");
        assert!(results.distances[0] < results.distances[2]);
    }

    #[tokio::test]
    async fn test_search_with_course_and_lesson_filter() {
        let store = seeded_store().await;

        let results = store.search("python question", Some("Python"), Some(1)).await;
        assert_eq!(results.documents.len(), 1);
        assert_eq!(results.metadata[0].lesson_number, Some(1));
    }

    #[tokio::test]
    async fn test_search_unknown_course_is_in_band_error() {
        let store = MemoryVectorStore::new(Arc::new(FakeEmbedder), 5);

        let results = store.search("anything", Some("Ghost Course"), None).await;
        assert!(results.is_empty());
        assert!(results.error.unwrap().contains("No course found"));
    }

    #[tokio::test]
    async fn test_resolve_course_fuzzy() {
        let store = seeded_store().await;

        let meta = store.resolve_course("mcp").await.unwrap().unwrap();
        assert_eq!(meta.title, "MCP Course");
    }

    #[tokio::test]
    async fn test_get_lesson_link() {
        let store = seeded_store().await;

        let link = store.get_lesson_link("Python Basics", 1).await;
        assert_eq!(link.as_deref(), Some("http://example.com/python/1"));

        assert!(store.get_lesson_link("Python Basics", 9).await.is_none());
        assert!(store.get_lesson_link("Unknown", 1).await.is_none());
    }
}
