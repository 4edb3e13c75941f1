//! Retrieval capabilities and the tool registry for the conversation loop.

mod outline;
mod search;

pub use outline::CourseOutlineTool;
pub use search::CourseSearchTool;

pub use crate::anthropic::ToolDefinition;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A citation derived from a retrieval match, surfaced for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    /// Display label, e.g. "Python Basics - Lesson 1".
    pub label: String,
    /// Lesson link when one could be resolved.
    pub link: Option<String>,
}

/// Shared handle to the most recent citation list.
///
/// Search-type capabilities overwrite it on every execution; the list is
/// read and cleared by the caller between queries, never by the manager.
#[derive(Clone, Default)]
pub struct SourceList {
    records: Arc<Mutex<Vec<SourceRecord>>>,
}

impl SourceList {
    /// Overwrite the list with the records of the latest execution.
    pub fn replace(&self, records: Vec<SourceRecord>) {
        *self.records.lock().unwrap() = records;
    }

    /// Copy out the current records.
    pub fn snapshot(&self) -> Vec<SourceRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Drop all records.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

/// A capability the model can invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Schema describing the capability to the model. Immutable once
    /// registered.
    fn definition(&self) -> ToolDefinition;

    /// Execute with the model-supplied arguments, returning text output.
    /// Handled conditions (empty results, lookup misses) come back as
    /// `Ok` with an explanatory string; real failures propagate.
    async fn execute(&self, args: Value) -> Result<String>;
}

/// Registry that holds named capabilities and dispatches execution.
pub struct ToolManager {
    tools: Vec<Arc<dyn Tool>>,
    sources: SourceList,
}

impl ToolManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            sources: SourceList::default(),
        }
    }

    /// Handle to the shared citation list, for wiring into capabilities.
    pub fn sources(&self) -> SourceList {
        self.sources.clone()
    }

    /// Register a capability under its definition name. Re-registering a
    /// name replaces the earlier capability in place, keeping its
    /// position in the definition order.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        match self
            .tools
            .iter()
            .position(|t| t.definition().name == name)
        {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    /// All registered schemas, in registration order.
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Dispatch execution by name. An unknown name is handled as data so
    /// the conversation loop can continue; capability errors propagate.
    pub async fn execute(&self, name: &str, args: Value) -> Result<String> {
        let tool = self.tools.iter().find(|t| t.definition().name == name);

        match tool {
            Some(tool) => {
                debug!("Executing tool '{}'", name);
                tool.execute(args).await
            }
            None => Ok(format!("Tool '{}' not found", name)),
        }
    }

    /// Citations written by the most recent search execution.
    pub fn get_last_sources(&self) -> Vec<SourceRecord> {
        self.sources.snapshot()
    }

    /// Clear the citation list. Caller-managed between queries.
    pub fn reset_sources(&self) {
        self.sources.clear();
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}
