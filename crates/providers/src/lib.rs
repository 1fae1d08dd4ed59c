//! Language model provider implementations for HevyChat.
//!
//! All providers implement the `hevychat_core::Provider` trait.

pub mod anthropic;

use std::sync::Arc;

use hevychat_config::AppConfig;
use hevychat_core::Provider;
use hevychat_core::error::ProviderError;

pub use anthropic::AnthropicProvider;

/// Build the configured provider.
///
/// Fails with [`ProviderError::NotConfigured`] when no Anthropic key is set,
/// so callers can report a configuration error before any request is made.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .anthropic_api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ProviderError::NotConfigured("ANTHROPIC_API_KEY is not set".into()))?;

    let provider = AnthropicProvider::new(api_key).with_base_url(&config.anthropic.base_url);
    Ok(Arc::new(provider))
}
