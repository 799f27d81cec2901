use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error taxonomy surfaced at the endpoint boundary. Everything the db or
/// an external provider throws is mapped into one of these before leaving
/// a handler; the original cause is logged server-side only.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input, 400 with a generic message.
    Input(&'static str),
    /// Validation failure with field-level detail, 400.
    Validation(&'static str, serde_json::Value),
    Unauthorized,
    NotFound(&'static str),
    Internal(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message, details) = match self {
            AppError::Input(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::Validation(message, details) => {
                (StatusCode::BAD_REQUEST, message, Some(details))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
        };

        let mut body = json!({ "error": message });
        if let Some(details) = details {
            body["details"] = details;
        }

        (code, Json(body)).into_response()
    }
}

pub trait ResultExt<T> {
    /// Map any error to a 500, logging the cause.
    fn reject(self, message: &'static str) -> Result<T, AppError>;
    /// Map any error to a 400, logging the cause.
    fn reject_input(self, message: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AppError::Internal(message)
        })
    }

    fn reject_input(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("{message}: {e}");
            AppError::Input(message)
        })
    }
}

pub trait OptionExt<T> {
    /// Map `None` to a 404.
    fn reject_not_found(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn reject_not_found(self, message: &'static str) -> Result<T, AppError> {
        self.ok_or(AppError::NotFound(message))
    }
}
