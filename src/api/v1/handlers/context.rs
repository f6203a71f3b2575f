/*
 * Responsibility
 * - GET /context, /context-token
 * - middleware が検証した ConnectCtx をそのまま返す (疎通・デバッグ用)
 */
use axum::Json;

use crate::api::v1::{dto::context::ContextResponse, extractors::ConnectCtxExtractor};

pub async fn context(ConnectCtxExtractor(ctx): ConnectCtxExtractor) -> Json<ContextResponse> {
    Json(ContextResponse {
        client_key: ctx.client_key,
        claims: ctx.claims,
    })
}
