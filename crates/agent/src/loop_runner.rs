//! The tool-calling chat loop.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use hevychat_config::AppConfig;
use hevychat_core::error::ProviderError;
use hevychat_core::event::{DomainEvent, EventBus};
use hevychat_core::message::{ContentBlock, Conversation, ConversationId, Message};
use hevychat_core::provider::{Provider, ProviderRequest, ProviderResponse};
use hevychat_core::tool::{ToolCall, ToolContext, ToolRegistry, ToolResult};
use tracing::{debug, error, info, warn};

use crate::prompt::SYSTEM_PROMPT;
use crate::stream::{self, ChatStream, StreamSink};

/// Hard cap on model calls within one chat turn.
pub const MAX_ITERATIONS: usize = 5;

/// Appended to the output when the cap is reached.
pub const CEILING_NOTICE: &str = "\n\n[Error: Maximum tool use iterations reached]";

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// How a chat turn ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// The model answered in text after `iterations` calls.
    Completed { iterations: usize },
    /// The model kept asking for tools; the ceiling notice was emitted.
    CeilingHit,
    /// The caller went away.
    Aborted,
}

impl LoopOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::CeilingHit => "ceiling",
            Self::Aborted => "aborted",
        }
    }
}

/// Drives one conversation turn: model call, tool fan-out, repeat.
///
/// The agent itself is shared and read-only; every turn gets its own
/// [`Conversation`] and its own [`ToolContext`] carrying the caller's
/// fitness client.
pub struct ChatAgent {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    event_bus: Option<Arc<EventBus>>,
}

impl ChatAgent {
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            tools,
            model: DEFAULT_MODEL.into(),
            system_prompt: SYSTEM_PROMPT.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            event_bus: None,
        }
    }

    /// Model, token budget and prompt override taken from the config.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        let agent = Self::new(provider, tools)
            .with_model(&config.model)
            .with_max_tokens(config.max_tokens);
        match &config.system_prompt_override {
            Some(prompt) if !prompt.trim().is_empty() => agent.with_system_prompt(prompt),
            _ => agent,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Publish loop events here. Nothing in the loop waits on subscribers.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Spawn a turn on the runtime and hand back its output stream.
    ///
    /// A provider failure arrives as the stream's final `Err` item.
    pub fn start(self: &Arc<Self>, ctx: ToolContext, history: Vec<Message>) -> ChatStream {
        let (sink, output) = stream::channel();
        let agent = Arc::clone(self);

        tokio::spawn(async move {
            match agent.run(&ctx, history, &sink).await {
                Ok(outcome) => {
                    debug!(outcome = outcome.label(), "Chat turn finished");
                    sink.close();
                }
                Err(e) => {
                    error!(error = %e, status = ?e.status_code(), "Chat turn failed");
                    sink.error(e).await;
                }
            }
        });

        output
    }

    /// Run one turn to completion, writing the answer into `sink`.
    pub async fn run(
        &self,
        ctx: &ToolContext,
        history: Vec<Message>,
        sink: &StreamSink,
    ) -> Result<LoopOutcome, ProviderError> {
        let conversation_id = ConversationId::new();
        let mut conversation = Conversation::from_history(history);
        let tools = self.tools.definitions();

        info!(
            conversation_id = %conversation_id,
            messages = conversation.len(),
            tools = tools.len(),
            "Starting chat turn"
        );

        let mut iteration = 0;
        let outcome = loop {
            if sink.is_closed() {
                break LoopOutcome::Aborted;
            }

            iteration += 1;
            if iteration > MAX_ITERATIONS {
                warn!(
                    conversation_id = %conversation_id,
                    "Maximum tool use iterations reached"
                );
                sink.enqueue(CEILING_NOTICE).await;
                break LoopOutcome::CeilingHit;
            }

            debug!(conversation_id = %conversation_id, iteration, "Calling model");
            let request = ProviderRequest {
                model: self.model.clone(),
                system: self.system_prompt.clone(),
                messages: conversation.messages().to_vec(),
                tools: tools.clone(),
                max_tokens: self.max_tokens,
            };

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    self.finish(&conversation_id, "failed", iteration);
                    return Err(e);
                }
            };
            self.model_responded(&conversation_id, iteration, &response);

            if !response.has_tool_use() {
                let mut delivered = true;
                for text in response.text_blocks() {
                    if !sink.enqueue(text.to_owned()).await {
                        delivered = false;
                        break;
                    }
                }
                break if delivered {
                    LoopOutcome::Completed { iterations: iteration }
                } else {
                    LoopOutcome::Aborted
                };
            }

            let calls = tool_calls(&response);
            debug!(
                conversation_id = %conversation_id,
                tools = ?calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "Executing tool calls"
            );

            // join_all yields results in input order, whatever order they finish in
            let results = join_all(
                calls
                    .iter()
                    .map(|call| self.run_tool(ctx, call, &conversation_id)),
            )
            .await;

            if sink.is_closed() {
                break LoopOutcome::Aborted;
            }

            conversation.push(Message::assistant_blocks(response.content));
            conversation.push(Message::tool_results(
                results.into_iter().map(ContentBlock::from),
            ));
        };

        self.finish(&conversation_id, outcome.label(), iteration.min(MAX_ITERATIONS));
        Ok(outcome)
    }

    async fn run_tool(
        &self,
        ctx: &ToolContext,
        call: &ToolCall,
        conversation_id: &ConversationId,
    ) -> ToolResult {
        let started = Instant::now();
        let result = self.tools.dispatch(ctx, call).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        debug!(
            tool = %call.name,
            success = !result.is_error,
            duration_ms,
            "Tool finished"
        );
        self.publish(DomainEvent::ToolExecuted {
            conversation_id: conversation_id.to_string(),
            tool_name: call.name.clone(),
            input: call.input.clone(),
            output: result.content.clone(),
            success: !result.is_error,
            duration_ms,
            timestamp: Utc::now(),
        });

        result
    }

    fn model_responded(
        &self,
        conversation_id: &ConversationId,
        iteration: usize,
        response: &ProviderResponse,
    ) {
        if self.event_bus.is_none() {
            return;
        }
        self.publish(DomainEvent::ModelResponded {
            conversation_id: conversation_id.to_string(),
            iteration,
            model: response.model.clone(),
            stop_reason: response.stop_reason.clone(),
            content: response.content.clone(),
            input_tokens: response.usage.map(|u| u.input_tokens),
            output_tokens: response.usage.map(|u| u.output_tokens),
            timestamp: Utc::now(),
        });
    }

    fn finish(&self, conversation_id: &ConversationId, outcome: &str, model_calls: usize) {
        self.publish(DomainEvent::TurnFinished {
            conversation_id: conversation_id.to_string(),
            outcome: outcome.to_string(),
            model_calls,
            timestamp: Utc::now(),
        });
    }

    fn publish(&self, event: DomainEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}

/// Tool invocations in the order the model listed them.
fn tool_calls(response: &ProviderResponse) -> Vec<ToolCall> {
    response
        .content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                id: id.clone(),
                name: name.clone(),
                input: input.clone(),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use hevychat_core::message::{MessageContent, Role};
    use serde_json::{Value, json};
    use tokio_stream::StreamExt;

    async fn collect(mut output: ChatStream) -> (String, Option<ProviderError>) {
        let mut text = String::new();
        while let Some(item) = output.next().await {
            match item {
                Ok(chunk) => text.push_str(&String::from_utf8_lossy(&chunk)),
                Err(e) => return (text, Some(e)),
            }
        }
        (text, None)
    }

    fn tool_result_blocks(message: &Message) -> Vec<(String, Value)> {
        match &message.content {
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::ToolResult { tool_use_id, content } => Some((
                        tool_use_id.clone(),
                        serde_json::from_str(content).unwrap(),
                    )),
                    _ => None,
                })
                .collect(),
            MessageContent::Text(_) => Vec::new(),
        }
    }

    #[tokio::test]
    async fn text_answer_streams_every_block() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_response(&[
            "Hello! ",
            "You trained 3 times this week.",
        ]))]));
        let agent = Arc::new(ChatAgent::new(provider.clone(), Arc::new(test_registry())));

        let output = agent.start(offline_context(), vec![Message::user("How am I doing?")]);
        let (text, err) = collect(output).await;

        assert!(err.is_none());
        assert_eq!(text, "Hello! You trained 3 times this week.");
        assert_eq!(provider.call_count(), 1);

        let request = &provider.requests()[0];
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(request.system.contains("fitness coach"));
        assert_eq!(request.tools.len(), 3);
        assert_eq!(request.messages, vec![Message::user("How am I doing?")]);
    }

    #[tokio::test]
    async fn tool_round_trip_appends_raw_response_then_results() {
        let first = tool_response(vec![
            ContentBlock::text("Let me check."),
            tool_use("toolu_1", "echo", json!({"value": 1})),
        ]);
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(first.clone()),
            Ok(text_response(&["Done."])),
        ]));
        let agent = ChatAgent::new(provider.clone(), Arc::new(test_registry()));
        let (sink, output) = stream::channel();

        let outcome = agent
            .run(&offline_context(), vec![Message::user("hi")], &sink)
            .await
            .unwrap();
        drop(sink);

        assert_eq!(outcome, LoopOutcome::Completed { iterations: 2 });
        // text next to a tool call is not relayed
        assert_eq!(collect(output).await.0, "Done.");

        let second = &provider.requests()[1];
        assert_eq!(second.messages.len(), 3);
        assert_eq!(second.messages[1], Message::assistant_blocks(first.content));
        assert_eq!(second.messages[2].role, Role::User);
        assert_eq!(
            tool_result_blocks(&second.messages[2]),
            vec![("toolu_1".to_string(), json!({"echo": {"value": 1}}))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn results_keep_invocation_order() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_response(vec![
                tool_use("a", "slow", json!({})),
                tool_use("b", "fast", json!({})),
            ])),
            Ok(text_response(&["ok"])),
        ]));
        let agent = ChatAgent::new(provider.clone(), Arc::new(test_registry()));
        let (sink, _output) = stream::channel();

        agent
            .run(&offline_context(), vec![Message::user("go")], &sink)
            .await
            .unwrap();

        let results = tool_result_blocks(&provider.requests()[1].messages[2]);
        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(results[0].1, json!({"slept_ms": 200}));
        assert_eq!(results[1].1, json!({"slept_ms": 10}));
    }

    #[tokio::test]
    async fn ceiling_stops_after_five_calls() {
        let provider = Arc::new(ScriptedProvider::repeating(tool_response(vec![tool_use(
            "toolu_x",
            "echo",
            json!({}),
        )])));
        let agent = ChatAgent::new(provider.clone(), Arc::new(test_registry()));
        let (sink, output) = stream::channel();

        let outcome = agent
            .run(&offline_context(), vec![Message::user("loop")], &sink)
            .await
            .unwrap();
        drop(sink);

        assert_eq!(outcome, LoopOutcome::CeilingHit);
        assert_eq!(provider.call_count(), MAX_ITERATIONS);
        assert_eq!(collect(output).await.0, CEILING_NOTICE);
        // each call sees the transcript grow by one assistant and one result message
        let requests = provider.requests();
        assert_eq!(requests[4].messages.len(), 9);
    }

    #[tokio::test]
    async fn text_on_fifth_call_is_a_normal_answer() {
        let tool_turn = tool_response(vec![tool_use("t", "echo", json!({}))]);
        let mut script: Vec<_> = (0..4).map(|_| Ok(tool_turn.clone())).collect();
        script.push(Ok(text_response(&["Finally."])));
        let provider = Arc::new(ScriptedProvider::new(script));
        let agent = ChatAgent::new(provider.clone(), Arc::new(test_registry()));
        let (sink, output) = stream::channel();

        let outcome = agent
            .run(&offline_context(), vec![Message::user("x")], &sink)
            .await
            .unwrap();
        drop(sink);

        assert_eq!(outcome, LoopOutcome::Completed { iterations: 5 });
        assert_eq!(collect(output).await.0, "Finally.");
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_result_and_loop_continues() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_response(vec![tool_use("u1", "teleport", json!({}))])),
            Ok(text_response(&["Sorry, I can't do that."])),
        ]));
        let agent = ChatAgent::new(provider.clone(), Arc::new(test_registry()));
        let (sink, _output) = stream::channel();

        let outcome = agent
            .run(&offline_context(), vec![Message::user("x")], &sink)
            .await
            .unwrap();

        assert_eq!(outcome, LoopOutcome::Completed { iterations: 2 });
        assert_eq!(
            tool_result_blocks(&provider.requests()[1].messages[2]),
            vec![("u1".to_string(), json!({"error": "Unknown tool: teleport"}))]
        );
    }

    #[tokio::test]
    async fn provider_failure_ends_stream_with_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(
            ProviderError::AuthenticationFailed("invalid x-api-key".into()),
        )]));
        let agent = Arc::new(ChatAgent::new(provider, Arc::new(test_registry())));

        let (text, err) = collect(agent.start(offline_context(), vec![Message::user("x")])).await;

        assert!(text.is_empty());
        assert_eq!(err.and_then(|e| e.status_code()), Some(401));
    }

    #[tokio::test]
    async fn caller_abort_discards_tool_results() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_response(vec![tool_use("h", "hang_up", json!({}))])),
            Ok(text_response(&["never sent"])),
        ]));
        let (sink, output) = stream::channel();
        let mut registry = test_registry();
        registry.register(Box::new(HangUpTool::new(output)));
        let agent = ChatAgent::new(provider.clone(), Arc::new(registry));

        let outcome = agent
            .run(&offline_context(), vec![Message::user("x")], &sink)
            .await
            .unwrap();

        assert_eq!(outcome, LoopOutcome::Aborted);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn closed_stream_before_start_makes_no_calls() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = ChatAgent::new(provider.clone(), Arc::new(test_registry()));
        let (sink, output) = stream::channel();
        drop(output);

        let outcome = agent
            .run(&offline_context(), vec![Message::user("x")], &sink)
            .await
            .unwrap();

        assert_eq!(outcome, LoopOutcome::Aborted);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn publishes_events() {
        let bus = Arc::new(EventBus::default());
        let mut events = bus.subscribe();
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_response(vec![tool_use("t1", "echo", json!({"n": 2}))])),
            Ok(text_response(&["ok"])),
        ]));
        let agent = ChatAgent::new(provider, Arc::new(test_registry())).with_event_bus(bus.clone());
        let (sink, _output) = stream::channel();

        agent
            .run(&offline_context(), vec![Message::user("x")], &sink)
            .await
            .unwrap();

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(seen.len(), 4);
        match seen[0].as_ref() {
            DomainEvent::ModelResponded {
                iteration, content, ..
            } => {
                assert_eq!(*iteration, 1);
                assert_eq!(content, &vec![tool_use("t1", "echo", json!({"n": 2}))]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match seen[1].as_ref() {
            DomainEvent::ToolExecuted {
                tool_name,
                success,
                input,
                output,
                ..
            } => {
                assert_eq!(tool_name, "echo");
                assert!(*success);
                assert_eq!(input, &json!({"n": 2}));
                let output: serde_json::Value = serde_json::from_str(output).unwrap();
                assert_eq!(output, json!({"echo": {"n": 2}}));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match seen[2].as_ref() {
            DomainEvent::ModelResponded {
                iteration, content, ..
            } => {
                assert_eq!(*iteration, 2);
                assert_eq!(content, &vec![ContentBlock::text("ok")]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            seen[3].as_ref(),
            DomainEvent::TurnFinished { model_calls: 2, .. }
        ));
    }

    #[test]
    fn config_overrides_model_and_prompt() {
        let config = AppConfig {
            model: "claude-test".into(),
            max_tokens: 512,
            system_prompt_override: Some("Be brief.".into()),
            ..AppConfig::default()
        };

        let agent = ChatAgent::from_config(
            Arc::new(ScriptedProvider::new(vec![])),
            Arc::new(ToolRegistry::new()),
            &config,
        );
        assert_eq!(agent.model(), "claude-test");
        assert_eq!(agent.max_tokens, 512);
        assert_eq!(agent.system_prompt, "Be brief.");
    }
}
