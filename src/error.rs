/*
 * Responsibility
 * - Application wide AppError
 * - IntoResponse (HTTP status + JSON `{ "message": ... }`)
 * - Repo / id codec errors are mapped to Internal by the handlers (per-operation
 *   message); details only go to the log
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Body is not parsable JSON.
    #[error("{0}")]
    BadRequest(&'static str),
    /// No credential supplied.
    #[error("No token, authorization denied")]
    Unauthenticated,
    /// Credential supplied but rejected.
    #[error("Token is not valid")]
    InvalidToken,
    /// Valid credential, but not the owner of the resource.
    #[error("Not allowed")]
    Forbidden,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Internal(&'static str),
}

impl AppError {
    pub fn bad_request(message: &'static str) -> Self {
        Self::BadRequest(message)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::NotFound(message)
    }

    pub fn internal(message: &'static str) -> Self {
        Self::Internal(message)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
