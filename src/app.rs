/*
 * Responsibility
 * - Config読み込み → 依存生成 (CredentialStore / ConnectStrategy) → Router 組み立て
 * - tracing / panic hook の初期化
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::repos::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use crate::services::connect::ConnectStrategy;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,connect_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panic via tracing so they don't get "lost"
        tracing::error!(?info, "panic");

        // In development, fail fast. In production, keep the server running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        product = ?config.product,
        base_url = %config.local_base_url,
        "starting connect-auth in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let store: Arc<dyn CredentialStore> = match config.database_url.as_deref() {
        Some(url) => {
            let store = PgCredentialStore::connect(url).await?;
            store.migrate().await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, credentials are kept in memory");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    let connect = ConnectStrategy::new(config.strategy_config(), store);
    Ok(AppState::new(Arc::new(connect)))
}

pub fn build_router(state: AppState) -> Router {
    async fn health() -> &'static str {
        "ok"
    }

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
