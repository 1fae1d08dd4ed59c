//! Hevy workout API integration for HevyChat.
//!
//! [`HevyClient`] implements `hevychat_core::FitnessData` for one API key.
//! [`HevyConnector`] builds clients per request from a resolved credential,
//! sharing one connection pool.

pub mod client;

use std::sync::Arc;

use hevychat_config::HevyConfig;
use hevychat_core::error::FitnessError;
use hevychat_core::fitness::{FitnessConnector, FitnessData};

pub use client::HevyClient;

/// Creates per-user [`HevyClient`]s against one base URL.
#[derive(Clone)]
pub struct HevyConnector {
    base_url: String,
    client: reqwest::Client,
}

impl HevyConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn from_config(config: &HevyConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl FitnessConnector for HevyConnector {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn FitnessData>, FitnessError> {
        let client = HevyClient::with_client(api_key, self.base_url.clone(), self.client.clone())?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_uses_configured_base_url() {
        let config = HevyConfig {
            api_key: None,
            base_url: "http://localhost:9000".into(),
        };
        let connector = HevyConnector::from_config(&config);
        assert_eq!(connector.base_url(), "http://localhost:9000");
        assert!(connector.connect("key").is_ok());
    }

    #[test]
    fn connector_rejects_blank_key() {
        let connector = HevyConnector::new(client::DEFAULT_BASE_URL);
        assert!(matches!(connector.connect(""), Err(FitnessError::MissingApiKey)));
    }
}
