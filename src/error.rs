/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - handshake の Outcome / HandshakeError を 401 / 500 に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::StoreError;
use crate::services::connect::{HandshakeError, Rejection};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{0}")]
    Unauthorized(Rejection),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized(reason) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", reason.to_string())
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<HandshakeError> for AppError {
    fn from(e: HandshakeError) -> Self {
        match e {
            HandshakeError::Rejected(reason) => AppError::Unauthorized(reason),
            HandshakeError::Store(StoreError::InvalidPayload(field)) => {
                AppError::bad_request("INVALID_PAYLOAD", format!("missing '{field}'"))
            }
            // Malformed tokens and store failures are not protocol outcomes
            HandshakeError::MalformedToken(_) | HandshakeError::Store(_) => AppError::Internal,
        }
    }
}
