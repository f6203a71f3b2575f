/*
 * Responsibility
 * - CredentialStore が上位に伝える失敗の定義
 * - handshake はこれを加工せずにそのまま返す (infrastructure failure)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error")]
    Db(#[from] sqlx::Error),

    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("invalid install payload: missing '{0}'")]
    InvalidPayload(&'static str),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
