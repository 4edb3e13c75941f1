//! Course outline capability.

use super::{Tool, ToolDefinition};
use crate::error::{KursError, Result};
use crate::vector_store::CourseCatalog;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Arguments the model supplies for an outline lookup.
#[derive(Debug, Deserialize)]
struct OutlineArgs {
    course_name: String,
}

/// Returns a course's structure: title, link and ordered lesson list.
///
/// Outline results are structural, not retrieval citations, so this
/// capability never touches the shared citation list.
pub struct CourseOutlineTool {
    catalog: Arc<dyn CourseCatalog>,
}

impl CourseOutlineTool {
    pub fn new(catalog: Arc<dyn CourseCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_course_outline".to_string(),
            description: "Get the outline of a course: its title, link, and complete lesson list".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    }
                },
                "required": ["course_name"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let args: OutlineArgs = serde_json::from_value(args)
            .map_err(|e| KursError::Tool(format!("Invalid outline arguments: {}", e)))?;

        let course = match self.catalog.resolve_course(&args.course_name).await? {
            Some(course) => course,
            None => {
                return Ok(format!(
                    "No course found matching '{}'",
                    args.course_name
                ))
            }
        };

        let mut output = format!("Course: {}", course.title);
        if let Some(link) = &course.course_link {
            output.push_str(&format!("\nCourse Link: {}", link));
        }

        let lessons = course.lessons()?;
        if !lessons.is_empty() {
            output.push_str("\n\nLessons:");
            for lesson in &lessons {
                output.push_str(&format!(
                    "\nLesson {}: {}",
                    lesson.lesson_number, lesson.lesson_title
                ));
            }
        }

        Ok(output)
    }
}
