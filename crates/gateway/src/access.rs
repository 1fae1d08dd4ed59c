//! Caller identity and Hevy credential resolution.
//!
//! Identity comes from the `X-User-Id` header. A caller's stored key wins;
//! the configured `hevy.api_key` is the fallback for single-user setups.

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use hevychat_core::error::{CredentialError, FitnessError};
use hevychat_core::fitness::FitnessData;
use thiserror::Error;

use crate::GatewayState;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Unauthorized: Please log in to access this resource")]
    Unauthorized,

    #[error("Hevy API key not configured. Please add your API key in settings.")]
    KeyNotConfigured,

    #[error(transparent)]
    Fitness(#[from] FitnessError),

    #[error(transparent)]
    Storage(#[from] CredentialError),
}

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::KeyNotConfigured
            | Self::Fitness(FitnessError::MissingApiKey | FitnessError::InvalidApiKey) => {
                StatusCode::FORBIDDEN
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::KeyNotConfigured | Self::Fitness(FitnessError::MissingApiKey) => {
                "API_KEY_NOT_CONFIGURED"
            }
            Self::Fitness(FitnessError::InvalidApiKey) => "INVALID_API_KEY",
            _ => "INTERNAL_ERROR",
        }
    }
}

/// The caller's id, if the header is present and non-blank.
pub fn caller_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// A fitness client for whoever is calling.
pub async fn resolve_fitness(
    state: &GatewayState,
    headers: &HeaderMap,
) -> Result<Arc<dyn FitnessData>, AccessError> {
    let user = caller_id(headers);
    let stored = match &user {
        Some(id) => state.credentials.get(id).await?,
        None => None,
    };

    let api_key = match stored.or_else(|| state.fallback_api_key.clone()) {
        Some(key) => key,
        None if user.is_none() => return Err(AccessError::Unauthorized),
        None => return Err(AccessError::KeyNotConfigured),
    };

    Ok(state.connector.connect(&api_key)?)
}
