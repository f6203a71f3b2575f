/*
 * Responsibility
 * - POST /installed (install / re-install / update)
 * - body と Authorization をそのまま InstallationHandshake に渡す
 */
use axum::{
    Json,
    extract::{OriginalUri, State},
    http::{HeaderMap, Method, StatusCode},
};
use serde_json::Value;

use crate::error::AppError;
use crate::services::connect::{ConnectRequest, Outcome};
use crate::state::AppState;

pub async fn installed(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let req = ConnectRequest::new(method, &uri, headers, body);

    match state.connect.install(&req).await {
        Outcome::Pass => Ok(StatusCode::NO_CONTENT),
        Outcome::Fail(reason) => Err(AppError::Unauthorized(reason)),
        Outcome::Error(e) => Err(e.into()),
        Outcome::Success(_) => Err(AppError::Internal),
    }
}
