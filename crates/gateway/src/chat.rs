//! `POST /api/chat`: one conversation turn, answered as a chunked text body.

use axum::{
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use futures::StreamExt;
use hevychat_core::error::ProviderError;
use hevychat_core::message::Message;
use hevychat_core::tool::ToolContext;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::SharedState;
use crate::access;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// One prior message as the browser sends it.
#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl From<ChatMessage> for Message {
    fn from(msg: ChatMessage) -> Self {
        if msg.role == "user" {
            Message::user(msg.content)
        } else {
            Message::assistant(msg.content)
        }
    }
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "error": error, "message": message.into() })),
    )
        .into_response()
}

fn provider_failure(e: &ProviderError) -> Response {
    let status = e
        .status_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut body = json!({
        "error": "Failed to process chat request",
        "message": e.to_string(),
    });
    if let Some(code) = e.status_code() {
        body["status"] = json!(code);
    }
    (status, Json(body)).into_response()
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Some(agent) = state.agent.clone() else {
        error!("Chat request rejected: Anthropic API key is not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Configuration Error",
            "Anthropic API key is not configured. Set ANTHROPIC_API_KEY or anthropic_api_key in the config file.",
        );
    };

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid request",
                rejection.body_text(),
            );
        }
    };
    if request.messages.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid request",
            "At least one message is required",
        );
    }

    let fitness = match access::resolve_fitness(&state, &headers).await {
        Ok(fitness) => fitness,
        Err(e) => {
            warn!(
                error = %e,
                error_type = e.error_type(),
                "Chat request without usable Hevy credential"
            );
            let body = json!({
                "error": "Failed to process chat request",
                "message": e.to_string(),
                "errorType": e.error_type(),
            });
            return (e.status(), Json(body)).into_response();
        }
    };

    let history: Vec<Message> = request.messages.into_iter().map(Message::from).collect();
    info!(messages = history.len(), "Chat request received");

    let mut output = agent.start(ToolContext::new(fitness), history);

    // Until the first item arrives nothing has been sent, so a failure can
    // still become a proper status code.
    let first = match output.next().await {
        Some(Err(e)) => return provider_failure(&e),
        first => first,
    };

    let body = Body::from_stream(futures::stream::iter(first).chain(output));
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
