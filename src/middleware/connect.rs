//! host platform JWT 検証 → ConnectCtx を extensions に入れる
//!
//! - `Authorization: JWT <token>` を AuthenticationHandshake で検証する
//! - QSH は nest 前の URI (OriginalUri) で計算する

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::debug;

use crate::api::v1::extractors::ConnectCtx;
use crate::error::AppError;
use crate::repos::Credentials;
use crate::services::connect::{AuthOptions, ConnectClaims, ConnectRequest, Outcome};
use crate::state::AppState;

#[derive(Clone)]
struct LayerState {
    app: AppState,
    options: AuthOptions,
}

/// Router に host platform JWT 認証を掛ける。
///
/// 例：
/// ```ignore
/// let ctx = Router::new().route("/context", get(context));
/// let ctx = middleware::connect::apply(ctx, state.clone(), AuthOptions::default());
/// ```
pub fn apply(router: Router<AppState>, state: AppState, options: AuthOptions) -> Router<AppState> {
    let layer_state = LayerState {
        app: state,
        options,
    };
    router.route_layer(middleware::from_fn_with_state(layer_state, connect_middleware))
}

async fn connect_middleware(
    State(layer): State<LayerState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|o| o.0.clone())
        .unwrap_or_else(|| req.uri().clone());

    let connect_req =
        ConnectRequest::bodiless(req.method().clone(), &uri, req.headers().clone());

    let hook = |claims: &ConnectClaims, _creds: &Credentials, r: &ConnectRequest| {
        debug!(iss = %claims.iss, path = %r.path, "connect request authenticated");
    };

    let ctx = match layer
        .app
        .connect
        .authenticate(&connect_req, layer.options, &hook)
        .await
    {
        Outcome::Success(auth) => ConnectCtx::from(auth),
        Outcome::Fail(reason) => return Err(AppError::Unauthorized(reason)),
        Outcome::Error(e) => return Err(e.into()),
        Outcome::Pass => return Err(AppError::Internal),
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
