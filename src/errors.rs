use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("no handler for intent: {0}")]
    UnhandledIntent(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnhandledIntent(_) => StatusCode::BAD_REQUEST,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Failures of the spreadsheet sink. Both variants end in the same apology
/// for the caller; they are kept apart for logs.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("append failed: {0}")]
    Append(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid date-time for {name}: {value:?}")]
    InvalidDateTime { name: &'static str, value: String },
}
