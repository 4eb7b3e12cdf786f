//! Read-only calendar proxy.
//!
//! Forwards the caller's bearer token to the calendar provider and returns
//! the simplified event list. No token is stored server-side.

use crate::web::AppState;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub async fn list_events(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Missing calendar authorization token" }))).into_response();
    };

    match state.calendar.list_events(token).await {
        Ok(events) => Json(events).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "calendar provider request failed");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": "Calendar provider request failed" }))).into_response()
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}
