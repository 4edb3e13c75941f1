//! Response generation with tool-calling support.
//!
//! Drives the model through a bounded iterate-execute-reissue loop: each
//! round appends the model's turn, answers every `tool_use` block through
//! the tool manager, and reissues the request with tools still enabled so
//! multi-step chains (tool -> tool -> answer) work.

use crate::anthropic::{
    ContentBlock, Message, MessagesRequest, MessagesResponse, ModelClient, ToolChoice,
    ToolDefinition,
};
use crate::error::Result;
use crate::tools::ToolManager;
use std::sync::Arc;
use tracing::debug;

/// Fallback when the final response carries no content blocks.
const NO_RESPONSE_FALLBACK: &str =
    "I was unable to generate a response. Please try rephrasing your question.";

/// Fallback when the final response has blocks but no text.
const NO_TEXT_FALLBACK: &str = "I was unable to generate a text response. Please try again.";

/// Maximum number of follow-up model requests after the initial one.
const DEFAULT_MAX_TOOL_ROUNDS: usize = 3;

/// Fixed generation parameters.
const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.0;

/// Drives model requests and the tool-execution loop for one query.
pub struct ResponseGenerator {
    client: Arc<dyn ModelClient>,
    model: String,
    system_prompt: String,
    max_tool_rounds: usize,
}

impl ResponseGenerator {
    /// Create a generator for the given model.
    pub fn new(client: Arc<dyn ModelClient>, model: &str, system_prompt: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Override the follow-up request cap.
    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Generate a response to `query`, optionally with conversation
    /// history, tool schemas, and a manager to execute them.
    ///
    /// Model-call and tool-execution errors propagate unmodified; the
    /// loop performs no retries.
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        manager: Option<&ToolManager>,
    ) -> Result<String> {
        // History is opaque: appended verbatim, never parsed.
        let system = match history {
            Some(history) => format!(
                "{}\n\nPrevious conversation:\n{}",
                self.system_prompt, history
            ),
            None => self.system_prompt.clone(),
        };

        let mut messages = vec![Message::user(query)];
        let request = self.build_request(&system, messages.clone(), tools);
        let mut response = self.client.create_message(&request).await?;

        if response.wants_tools() {
            if let Some(manager) = manager {
                response = self
                    .run_tool_loop(response, &mut messages, &system, tools, manager)
                    .await?;
            }
        }

        Ok(extract_text(&response))
    }

    /// Bounded loop: execute requested tools, feed results back, reissue.
    async fn run_tool_loop(
        &self,
        initial: MessagesResponse,
        messages: &mut Vec<Message>,
        system: &str,
        tools: Option<&[ToolDefinition]>,
        manager: &ToolManager,
    ) -> Result<MessagesResponse> {
        let mut current = initial;

        for round in 0..self.max_tool_rounds {
            debug!("Tool round {}", round + 1);

            // The model's own turn goes into the history verbatim.
            messages.push(Message::assistant_blocks(current.content.clone()));

            // Answer every tool_use block, pairing results by id and
            // preserving the originating block order.
            let mut results = Vec::new();
            for block in &current.content {
                if let ContentBlock::ToolUse { id, name, input } = block {
                    let output = manager.execute(name, input.clone()).await?;
                    results.push(ContentBlock::ToolResult {
                        tool_use_id: id.clone(),
                        content: output,
                    });
                }
            }

            if !results.is_empty() {
                messages.push(Message::tool_results(results));
            }

            // Tools stay enabled so the model can chain further calls.
            let request = self.build_request(system, messages.clone(), tools);
            current = self.client.create_message(&request).await?;

            if !current.wants_tools() {
                break;
            }
        }

        Ok(current)
    }

    fn build_request(
        &self,
        system: &str,
        messages: Vec<Message>,
        tools: Option<&[ToolDefinition]>,
    ) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: system.to_string(),
            messages,
            tools: tools.map(|t| t.to_vec()),
            tool_choice: tools.map(|_| ToolChoice::Auto),
        }
    }
}

/// Pull the answer text out of the final response.
fn extract_text(response: &MessagesResponse) -> String {
    if response.content.is_empty() {
        return NO_RESPONSE_FALLBACK.to_string();
    }

    for block in &response.content {
        if let ContentBlock::Text { text } = block {
            return text.clone();
        }
    }

    NO_TEXT_FALLBACK.to_string()
}
