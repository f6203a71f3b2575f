/*
 * Responsibility
 * - Handler から見える「検証済みコンテキスト」の型
 * - middleware が handshake を通して request extensions に格納し、handler はこの型だけを受け取る
 */
use crate::repos::Credentials;
use crate::services::connect::{Authenticated, ConnectClaims};

/// 検証済みの host platform リクエストに付与されるコンテキスト
///
/// - `client_key` は tenant id（署名検証済みなので信頼してよい）
/// - `claims` は shared secret で検証済みの JWT claims
#[derive(Debug, Clone)]
pub struct ConnectCtx {
    pub client_key: String,
    pub claims: ConnectClaims,
    pub credentials: Credentials,
}

impl From<Authenticated> for ConnectCtx {
    fn from(auth: Authenticated) -> Self {
        Self {
            client_key: auth.credentials.client_key.clone(),
            claims: auth.claims,
            credentials: auth.credentials,
        }
    }
}
