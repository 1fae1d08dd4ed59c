//! Scripted provider, stub tools and an offline fitness client for loop tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hevychat_core::error::{FitnessError, ProviderError, ToolError};
use hevychat_core::fitness::*;
use hevychat_core::message::ContentBlock;
use hevychat_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext, ToolRegistry};
use serde_json::{Value, json};

use crate::stream::ChatStream;

/// Returns scripted responses in order and records every request.
pub struct ScriptedProvider {
    script: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    repeat: Option<ProviderResponse>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(mut script: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        script.reverse();
        Self {
            script: Mutex::new(script),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with the same response.
    pub fn repeating(response: ProviderResponse) -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            repeat: Some(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if let Some(response) = &self.repeat {
            return Ok(response.clone());
        }
        self.script
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(ProviderError::InvalidRequest("script exhausted".into())))
    }
}

fn response(content: Vec<ContentBlock>, stop_reason: &str) -> ProviderResponse {
    ProviderResponse {
        id: "msg_test".into(),
        model: "claude-test".into(),
        content,
        stop_reason: Some(stop_reason.into()),
        usage: Some(Usage {
            input_tokens: 10,
            output_tokens: 5,
        }),
    }
}

pub fn text_response(blocks: &[&str]) -> ProviderResponse {
    response(
        blocks.iter().map(|t| ContentBlock::text(*t)).collect(),
        "end_turn",
    )
}

pub fn tool_response(content: Vec<ContentBlock>) -> ProviderResponse {
    response(content, "tool_use")
}

pub fn tool_use(id: &str, name: &str, input: Value) -> ContentBlock {
    ContentBlock::ToolUse {
        id: id.into(),
        name: name.into(),
        input,
    }
}

/// Echoes its input back as `{"echo": input}`.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Echo the input"
    }
    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }
    async fn execute(&self, _ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        Ok(json!({ "echo": args }))
    }
}

/// Sleeps before answering, to reorder completion.
pub struct SleepTool {
    name: &'static str,
    millis: u64,
}

#[async_trait]
impl Tool for SleepTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "Sleep, then report how long"
    }
    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }
    async fn execute(&self, _ctx: &ToolContext, _args: Value) -> Result<Value, ToolError> {
        tokio::time::sleep(Duration::from_millis(self.millis)).await;
        Ok(json!({ "slept_ms": self.millis }))
    }
}

/// Drops the caller's end of the output stream while running.
pub struct HangUpTool(Mutex<Option<ChatStream>>);

impl HangUpTool {
    pub fn new(output: ChatStream) -> Self {
        Self(Mutex::new(Some(output)))
    }
}

#[async_trait]
impl Tool for HangUpTool {
    fn name(&self) -> &str {
        "hang_up"
    }
    fn description(&self) -> &str {
        "Disconnect the caller"
    }
    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }
    async fn execute(&self, _ctx: &ToolContext, _args: Value) -> Result<Value, ToolError> {
        drop(self.0.lock().unwrap().take());
        Ok(json!({}))
    }
}

/// `echo`, `slow` (200 ms) and `fast` (10 ms).
pub fn test_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool));
    registry.register(Box::new(SleepTool {
        name: "slow",
        millis: 200,
    }));
    registry.register(Box::new(SleepTool {
        name: "fast",
        millis: 10,
    }));
    registry
}

/// Fitness client that fails every call; the loop tests never reach it.
pub struct Offline;

fn offline<T>() -> Result<T, FitnessError> {
    Err(FitnessError::Connection("offline".into()))
}

#[async_trait]
impl FitnessData for Offline {
    async fn workouts(&self, _: u32, _: u32) -> Result<WorkoutPage, FitnessError> {
        offline()
    }
    async fn workout(&self, _: &str) -> Result<Workout, FitnessError> {
        offline()
    }
    async fn workout_count(&self) -> Result<WorkoutCount, FitnessError> {
        offline()
    }
    async fn create_workout(&self, _: &CreateWorkoutRequest) -> Result<Workout, FitnessError> {
        offline()
    }
    async fn workout_events(
        &self,
        _: &str,
        _: u32,
        _: u32,
    ) -> Result<WorkoutEventPage, FitnessError> {
        offline()
    }
    async fn routines(&self, _: u32, _: u32) -> Result<RoutinePage, FitnessError> {
        offline()
    }
    async fn routine(&self, _: &str) -> Result<Routine, FitnessError> {
        offline()
    }
    async fn create_routine(&self, _: &CreateRoutineRequest) -> Result<Routine, FitnessError> {
        offline()
    }
    async fn update_routine(&self, _: &str, _: &RoutineUpdate) -> Result<Routine, FitnessError> {
        offline()
    }
    async fn routine_folders(&self) -> Result<RoutineFolderList, FitnessError> {
        offline()
    }
    async fn create_routine_folder(
        &self,
        _: &CreateRoutineFolderRequest,
    ) -> Result<RoutineFolder, FitnessError> {
        offline()
    }
    async fn exercise_templates(&self) -> Result<ExerciseTemplateList, FitnessError> {
        offline()
    }
    async fn exercise_history(
        &self,
        _: &str,
        _: Option<&str>,
        _: Option<&str>,
    ) -> Result<ExerciseHistory, FitnessError> {
        offline()
    }
}

pub fn offline_context() -> ToolContext {
    ToolContext::new(Arc::new(Offline))
}
