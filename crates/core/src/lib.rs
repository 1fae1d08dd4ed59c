//! # HevyChat Core
//!
//! Domain types, traits, and error definitions for the HevyChat workout
//! assistant. This crate has **zero framework dependencies**: it defines the
//! domain model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here. Implementations live in their
//! respective crates:
//! - [`Provider`]: the language model (`hevychat-providers`)
//! - [`FitnessData`]: the Hevy workout API (`hevychat-hevy`)
//! - [`CredentialStore`]: per-user Hevy API keys (in-memory here, swappable)
//!
//! Tests swap any of them for scripted stubs.

pub mod credentials;
pub mod error;
pub mod event;
pub mod fitness;
pub mod message;
pub mod provider;
pub mod schema;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use credentials::{CredentialStore, InMemoryCredentialStore, mask_key};
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use fitness::{FitnessConnector, FitnessData};
pub use message::{ContentBlock, Conversation, ConversationId, Message, MessageContent, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use schema::{ParamKind, ParamSpec};
pub use tool::{Tool, ToolCall, ToolContext, ToolRegistry, ToolResult};
