/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /installed は middleware を通さない (handshake 自体が認可を判断する)
 * - /context は QSH 必須、/context-token は QSH を検証しない (context JWT 用)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::services::connect::AuthOptions;
use crate::state::AppState;

use crate::api::v1::handlers::{context::context, health::health, lifecycle::installed};

pub fn routes(state: AppState) -> Router<AppState> {
    let bound = middleware::connect::apply(
        Router::new().route("/context", get(context)),
        state.clone(),
        AuthOptions::default(),
    );

    let unbound = middleware::connect::apply(
        Router::new().route("/context-token", get(context)),
        state,
        AuthOptions { skip_qsh: true },
    );

    Router::new()
        .route("/health", get(health))
        .route("/installed", post(installed))
        .merge(bound)
        .merge(unbound)
}
