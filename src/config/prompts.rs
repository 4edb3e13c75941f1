//! Prompt templates for Kurs.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub qa: QaPrompts,
}

/// Prompts for tool-augmented question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub system: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an AI assistant specialized in course materials and educational content, with access to tools for course information.

Available Tools:
1. **search_course_content** - Search within course content for specific information
2. **get_course_outline** - Get course structure (title, course link, lesson list with numbers and titles)

Tool Selection:
- **Outline queries** (course structure, lesson lists, what topics a course covers): use get_course_outline
  - For outline responses, include the course title, the course link, and every lesson with its number and title
- **Content queries** (specific information, explanations, details within lessons): use search_course_content
- You may use multiple tools if needed to fully answer a question
- If a tool yields no results, state this clearly without offering alternatives

Response Protocol:
- **General knowledge questions**: answer from existing knowledge without searching
- **Course-specific questions**: use the appropriate tool first, then answer
- Provide direct answers only - no reasoning process, search explanations, or question-type analysis
- Do not mention "based on the search results" or "based on the outline"

All responses must be:
1. **Brief and focused** - get to the point quickly
2. **Educational** - maintain instructional value
3. **Clear** - use accessible language
4. **Example-supported** - include relevant examples when they aid understanding
Provide only the direct answer to what was asked."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying overrides from the custom directory if set.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }
}
