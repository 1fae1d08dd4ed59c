//! Tool trait: the abstraction over the assistant's capabilities.
//!
//! Tools are what let the model read and change the user's training data:
//! fetch recent workouts, compute statistics, create routines, etc.
//! A tool never holds a client of its own; every call receives a
//! [`ToolContext`] bound to the requesting user.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ToolError;
use crate::fitness::FitnessData;
use crate::message::ContentBlock;
use crate::provider::ToolDefinition;
use crate::schema::{self, ParamSpec};

/// A request from the model to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Invocation id (matches the model's tool_use id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub input: Value,
}

/// The outcome of one tool invocation, ready to send back to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The invocation this result answers
    pub tool_use_id: String,

    /// JSON text of the tool's output, or of `{"error": "..."}`
    pub content: String,

    /// Whether `content` carries an error object
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(tool_use_id: impl Into<String>, value: &Value) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: value.to_string(),
            is_error: false,
        }
    }

    pub fn failure(tool_use_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: json!({ "error": message.into() }).to_string(),
            is_error: true,
        }
    }
}

impl From<ToolResult> for ContentBlock {
    fn from(result: ToolResult) -> Self {
        ContentBlock::ToolResult {
            tool_use_id: result.tool_use_id,
            content: result.content,
        }
    }
}

/// Per-request execution context handed to every tool.
#[derive(Clone)]
pub struct ToolContext {
    /// The requesting user's fitness data client
    pub fitness: Arc<dyn FitnessData>,

    /// "Now" for date-window computations
    pub now: DateTime<Utc>,
}

impl ToolContext {
    pub fn new(fitness: Arc<dyn FitnessData>) -> Self {
        Self {
            fitness,
            now: Utc::now(),
        }
    }

    /// Pin the clock, so date windows are reproducible.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// The core Tool trait.
///
/// Each tool (get_recent_workouts, create_routine, etc.) implements this
/// trait. Tools are registered in the ToolRegistry and made available to
/// the chat loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "get_recent_workouts").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// Declared parameters, rendered into a JSON schema for the model.
    fn parameters(&self) -> Vec<ParamSpec>;

    /// Execute the tool with the given arguments.
    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: schema::input_schema(&self.parameters()),
        }
    }
}

/// A registry of available tools.
///
/// The chat loop uses this to:
/// 1. Get tool definitions to send to the model
/// 2. Look up and execute tools when the model requests them
///
/// Enumeration follows registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&slot| self.tools[slot].as_ref())
    }

    /// Get all tool definitions (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        schema::to_provider_format(self.tools.iter().map(|t| t.as_ref()))
    }

    /// Execute a tool call.
    pub async fn execute(&self, ctx: &ToolContext, call: &ToolCall) -> Result<Value, ToolError> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        tool.execute(ctx, call.input.clone()).await
    }

    /// Execute a tool call, folding any failure into an `{"error": ...}` result.
    pub async fn dispatch(&self, ctx: &ToolContext, call: &ToolCall) -> ToolResult {
        match self.execute(ctx, call).await {
            Ok(value) => ToolResult::success(&call.id, &value),
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                ToolResult::failure(&call.id, e.to_string())
            }
        }
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
