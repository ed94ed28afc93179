use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::models::{IntentEvent, WebhookRequest, WebhookResponse};
use crate::services::dispatcher;
use crate::state::AppState;

pub async fn fulfillment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, AppError> {
    let headers = header_map(&headers);
    tracing::debug!(headers = ?headers, "fulfillment request headers");

    let body = String::from_utf8(body.to_vec()).map_err(|e| {
        tracing::warn!(error = %e, "fulfillment request body is not UTF-8");
        AppError::BadRequest(e.to_string())
    })?;
    tracing::debug!(body = %body, "fulfillment request body");

    let request: WebhookRequest = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "malformed fulfillment request");
        AppError::BadRequest(e.to_string())
    })?;

    let event = IntentEvent::from_request(request, headers, body);
    let response = dispatcher::dispatch(&state, &event).await.map_err(|e| {
        tracing::warn!(error = %e, "fulfillment not handled");
        e
    })?;

    Ok(Json(response))
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
