//! Domain event system: observation of a chat turn without coupling to it.
//!
//! The chat loop publishes what it sees (model responses, tool runs, how the
//! turn ended). Subscribers such as the payload logger react to these without
//! the loop knowing they exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::message::ContentBlock;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// The model answered one completion request
    ModelResponded {
        conversation_id: String,
        iteration: usize,
        model: String,
        stop_reason: Option<String>,
        /// The response blocks as received
        content: Vec<ContentBlock>,
        input_tokens: Option<u32>,
        output_tokens: Option<u32>,
        timestamp: DateTime<Utc>,
    },

    /// A tool invocation finished
    ToolExecuted {
        conversation_id: String,
        tool_name: String,
        input: serde_json::Value,
        /// JSON text handed back to the model
        output: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A chat turn ended
    TurnFinished {
        conversation_id: String,
        /// "completed", "ceiling", "aborted" or "failed"
        outcome: String,
        model_calls: usize,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
/// Components can subscribe to receive all events and filter for what they care about.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
