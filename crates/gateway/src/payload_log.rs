//! Optional payload logging, fed from the event bus.
//!
//! Enabled with `logging.log_payloads`. The chat loop never waits on it.

use std::sync::Arc;

use hevychat_core::event::DomainEvent;
use hevychat_core::message::ContentBlock;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Log every event until the bus closes.
pub fn spawn(mut events: broadcast::Receiver<Arc<DomainEvent>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Payload logger fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &DomainEvent) {
    match event {
        DomainEvent::ModelResponded {
            conversation_id,
            iteration,
            model,
            stop_reason,
            content,
            input_tokens,
            output_tokens,
            ..
        } => debug!(
            conversation_id = %conversation_id,
            iteration,
            model = %model,
            stop_reason = ?stop_reason,
            content = %render_blocks(content),
            input_tokens = ?input_tokens,
            output_tokens = ?output_tokens,
            "Model responded"
        ),
        DomainEvent::ToolExecuted {
            conversation_id,
            tool_name,
            input,
            output,
            success,
            duration_ms,
            ..
        } => debug!(
            conversation_id = %conversation_id,
            tool = %tool_name,
            input = %input,
            output = %output,
            success,
            duration_ms,
            "Tool executed"
        ),
        DomainEvent::TurnFinished {
            conversation_id,
            outcome,
            model_calls,
            ..
        } => debug!(
            conversation_id = %conversation_id,
            outcome = %outcome,
            model_calls,
            "Chat turn finished"
        ),
    }
}

/// Response blocks as one JSON array, the way the model sent them.
fn render_blocks(content: &[ContentBlock]) -> String {
    serde_json::to_string(content).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}
