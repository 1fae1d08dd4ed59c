//! Error types for the HevyChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for all HevyChat operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Fitness data errors ---
    #[error("Fitness data error: {0}")]
    Fitness(#[from] FitnessError),

    // --- Credential errors ---
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// The HTTP status the provider reported, when there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => Some(*status_code),
            Self::RateLimited { .. } => Some(429),
            Self::AuthenticationFailed(_) => Some(401),
            Self::InvalidRequest(_) => Some(400),
            Self::NotConfigured(_) | Self::Network(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    /// The fitness collaborator failed; the message is shown to the model as-is.
    #[error("{0}")]
    Fitness(#[from] FitnessError),
}

#[derive(Debug, Clone, Error)]
pub enum FitnessError {
    #[error("Hevy API key is required")]
    MissingApiKey,

    #[error("Invalid or expired Hevy API key. Please check your API key in settings.")]
    InvalidApiKey,

    #[error("Hevy API Error: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to connect to Hevy API: {0}. Please check your internet connection.")]
    Connection(String),

    #[error("Failed to decode Hevy API response: {0}")]
    Decode(String),

    #[error("Hevy API returned an empty {0} response")]
    EmptyResponse(&'static str),

    #[error("Invalid Hevy id: {0:?}")]
    InvalidId(String),
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Hevy API key cannot be empty")]
    EmptyKey,

    #[error("Credential storage failed: {0}")]
    Storage(String),
}
