use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::state::AppState;

use super::ConnectCtx;

/// Handler で ConnectCtx を受け取るための extractor
/// middleware が ConnectCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（middleware 未設定）
pub struct ConnectCtxExtractor(pub ConnectCtx);

impl FromRequestParts<AppState> for ConnectCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ConnectCtx>()
            .cloned()
            .map(ConnectCtxExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
