//! Anthropic Messages API wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single block of message content.
///
/// Assistant turns carry `text` and `tool_use` blocks; the user turn that
/// answers a tool-use round carries `tool_result` blocks paired back to
/// the originating `tool_use` by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

/// Message content: either a plain string or a sequence of blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Create a plain-text user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create an assistant message from content blocks.
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Create a user message carrying tool results.
    pub fn tool_results(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        }
    }
}

/// Tool schema as the model consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Tool-selection mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    #[serde(other)]
    Other,
}

/// Response body from `POST /v1/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
}

impl MessagesResponse {
    /// Whether the model is requesting tool execution.
    pub fn wants_tools(&self) -> bool {
        self.stop_reason == Some(StopReason::ToolUse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_block_serialization() {
        let block = ContentBlock::ToolUse {
            id: "toolu_01".to_string(),
            name: "search_course_content".to_string(),
            input: json!({"query": "embeddings"}),
        };

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "tool_use");
        assert_eq!(value["name"], "search_course_content");
        assert_eq!(value["input"]["query"], "embeddings");
    }

    #[test]
    fn test_tool_result_serialization() {
        let block = ContentBlock::ToolResult {
            tool_use_id: "toolu_01".to_string(),
            content: "[Course A - Lesson 1]\nIntro text".to_string(),
        };

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "tool_result");
        assert_eq!(value["tool_use_id"], "toolu_01");
    }

    #[test]
    fn test_message_content_untagged() {
        let plain = Message::user("hello");
        let value = serde_json::to_value(&plain).unwrap();
        assert_eq!(value["content"], "hello");

        let blocks = Message::tool_results(vec![ContentBlock::ToolResult {
            tool_use_id: "t1".to_string(),
            content: "ok".to_string(),
        }]);
        let value = serde_json::to_value(&blocks).unwrap();
        assert!(value["content"].is_array());
    }

    #[test]
    fn test_response_deserialization() {
        let body = json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Here is the answer."},
                {"type": "tool_use", "id": "toolu_02", "name": "get_course_outline", "input": {"course_name": "MCP"}}
            ],
            "stop_reason": "tool_use"
        });

        let response: MessagesResponse = serde_json::from_value(body).unwrap();
        assert!(response.wants_tools());
        assert_eq!(response.content.len(), 2);
        match &response.content[0] {
            ContentBlock::Text { text } => assert_eq!(text, "Here is the answer."),
            _ => panic!("Expected text block"),
        }
    }

    #[test]
    fn test_unknown_stop_reason() {
        let body = json!({
            "content": [{"type": "text", "text": "hi"}],
            "stop_reason": "pause_turn"
        });

        let response: MessagesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.stop_reason, Some(StopReason::Other));
        assert!(!response.wants_tools());
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 800,
            temperature: 0.0,
            system: "system".to_string(),
            messages: vec![Message::user("q")],
            tools: None,
            tool_choice: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
    }
}
