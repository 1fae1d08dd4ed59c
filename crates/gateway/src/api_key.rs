//! `/api/user/api-key`: the caller's stored Hevy API key.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use hevychat_core::credentials::mask_key;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::SharedState;
use crate::access::caller_id;

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn unauthorized() -> Response {
    reply(StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" }))
}

fn internal(e: impl std::fmt::Display) -> Response {
    error!(error = %e, "Credential store failed");
    reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Internal server error" }),
    )
}

/// `GET`: the masked key, or 404 when none is stored.
pub async fn get_api_key(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let Some(user) = caller_id(&headers) else {
        return unauthorized();
    };

    match state.credentials.get(&user).await {
        Ok(Some(key)) => reply(
            StatusCode::OK,
            json!({ "apiKey": mask_key(&key), "configured": true }),
        ),
        Ok(None) => reply(
            StatusCode::NOT_FOUND,
            json!({ "error": "API key not configured" }),
        ),
        Err(e) => internal(e),
    }
}

/// `PUT {apiKey}`: store the key, trimmed.
pub async fn save_api_key(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(user) = caller_id(&headers) else {
        return unauthorized();
    };

    let Some(api_key) = body.get("apiKey").and_then(Value::as_str) else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "error": "API key is required" }),
        );
    };
    if api_key.trim().is_empty() {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "error": "API key cannot be empty" }),
        );
    }

    match state.credentials.save(&user, api_key).await {
        Ok(()) => {
            info!(user = %user, "Hevy API key saved");
            reply(
                StatusCode::OK,
                json!({ "success": true, "message": "API key saved successfully" }),
            )
        }
        Err(e) => internal(e),
    }
}

/// `DELETE`: forget the key.
pub async fn delete_api_key(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let Some(user) = caller_id(&headers) else {
        return unauthorized();
    };

    match state.credentials.delete(&user).await {
        Ok(true) => {
            info!(user = %user, "Hevy API key deleted");
            reply(
                StatusCode::OK,
                json!({ "success": true, "message": "API key deleted successfully" }),
            )
        }
        Ok(false) => reply(
            StatusCode::NOT_FOUND,
            json!({ "error": "API key not configured" }),
        ),
        Err(e) => internal(e),
    }
}
