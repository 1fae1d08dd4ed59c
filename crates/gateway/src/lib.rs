//! HTTP gateway for HevyChat.
//!
//! Exposes the chat endpoint, the per-user API key settings, a thin proxy
//! over the caller's Hevy account, and a health check.
//!
//! Built on Axum.

pub mod access;
pub mod api_key;
pub mod chat;
pub mod hevy_proxy;
pub mod payload_log;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method, header};
use axum::{
    Router,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use hevychat_agent::ChatAgent;
use hevychat_config::AppConfig;
use hevychat_core::credentials::{CredentialStore, InMemoryCredentialStore};
use hevychat_core::event::EventBus;
use hevychat_core::fitness::FitnessConnector;
use hevychat_hevy::HevyConnector;

/// Shared application state for the gateway.
pub struct GatewayState {
    /// `None` when no Anthropic key is configured; chat then answers 500.
    pub agent: Option<Arc<ChatAgent>>,
    pub connector: Arc<dyn FitnessConnector>,
    pub credentials: Arc<dyn CredentialStore>,
    /// Configured `hevy.api_key`, used when the caller has none stored.
    pub fallback_api_key: Option<String>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// Build provider, tools, agent and Hevy connector from the config.
    pub fn from_config(config: &AppConfig, event_bus: Arc<EventBus>) -> Self {
        let agent = match hevychat_providers::build_from_config(config) {
            Ok(provider) => {
                let tools = Arc::new(hevychat_tools::default_registry());
                Some(Arc::new(
                    ChatAgent::from_config(provider, tools, config).with_event_bus(event_bus),
                ))
            }
            Err(e) => {
                warn!(error = %e, "Chat is disabled until an Anthropic API key is configured");
                None
            }
        };

        Self {
            agent,
            connector: Arc::new(HevyConnector::from_config(&config.hevy)),
            credentials: Arc::new(InMemoryCredentialStore::new()),
            fallback_api_key: config
                .hevy
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
        }
    }
}

/// Build the router with all routes.
///
/// Layers applied:
/// - CORS for the browser client
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(access::USER_ID_HEADER),
        ])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat::chat_handler))
        .route(
            "/api/user/api-key",
            get(api_key::get_api_key)
                .put(api_key::save_api_key)
                .delete(api_key::delete_api_key),
        )
        .nest("/api/hevy", hevy_proxy::router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let event_bus = Arc::new(EventBus::default());
    if config.logging.log_payloads {
        payload_log::spawn(event_bus.subscribe());
        info!("Payload logging enabled");
    }

    let state = Arc::new(GatewayState::from_config(&config, event_bus));
    let app = build_router(state);

    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
