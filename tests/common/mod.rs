//! Shared helpers for handshake integration tests.
#![allow(dead_code, clippy::expect_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, Method, Uri, header};
use connect_auth::repos::{
    CredentialStore, Credentials, MemoryCredentialStore, StoreError, StoreResult,
};
use connect_auth::services::connect::{ConnectRequest, qsh::query_string_hash};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

pub const BASE_URL: &str = "https://addon.example.com";

pub fn base_url() -> url::Url {
    url::Url::parse(BASE_URL).expect("base url")
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// HS256-sign arbitrary claims.
pub fn sign(claims: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

pub fn qsh(method: &str, path: &str, query: Option<&str>) -> String {
    query_string_hash(method, path, query, &base_url())
}

/// Token for `iss` bound to `method uri`, valid for five minutes.
pub fn bound_token(iss: &str, secret: &str, method: &str, uri: &str) -> String {
    let uri: Uri = uri.parse().expect("uri");
    sign(
        &json!({
            "iss": iss,
            "iat": now(),
            "exp": now() + 300,
            "qsh": qsh(method, uri.path(), uri.query()),
        }),
        secret,
    )
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Value) -> ConnectRequest {
    let uri: Uri = uri.parse().expect("uri");
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("JWT {token}")).expect("header"),
        );
    }
    ConnectRequest::new(method, &uri, headers, body)
}

pub fn install_payload(client_key: &str, secret: &str) -> Value {
    json!({
        "key": "my-app",
        "clientKey": client_key,
        "sharedSecret": secret,
        "baseUrl": "https://tenant.example.net",
        "eventType": "installed",
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveCall {
    pub client_key: String,
    pub payload: Value,
    pub previous: Option<Credentials>,
}

/// Memory store that records every `save` and can inject failures and latency.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryCredentialStore,
    saves: Mutex<Vec<SaveCall>>,
    fail_loads: AtomicBool,
    load_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load_delay(delay: Duration) -> Self {
        Self {
            load_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Install `client_key` directly, without recording a save.
    pub async fn seed(&self, client_key: &str, secret: &str) -> Credentials {
        self.inner
            .save(client_key, &install_payload(client_key, secret), None)
            .await
            .expect("seed");
        self.inner
            .load(client_key)
            .await
            .expect("load")
            .expect("seeded")
    }

    pub fn saves(&self) -> Vec<SaveCall> {
        self.saves.lock().expect("lock").clone()
    }

    pub fn fail_loads(&self) {
        self.fail_loads.store(true, Ordering::SeqCst);
    }

    pub async fn current(&self, client_key: &str) -> Option<Credentials> {
        self.inner.load(client_key).await.expect("load")
    }
}

#[async_trait]
impl CredentialStore for RecordingStore {
    async fn load(&self, client_key: &str) -> StoreResult<Option<Credentials>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection refused".into()));
        }
        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.load(client_key).await
    }

    async fn save(
        &self,
        client_key: &str,
        payload: &Value,
        previous: Option<&Credentials>,
    ) -> StoreResult<()> {
        self.saves.lock().expect("lock").push(SaveCall {
            client_key: client_key.to_string(),
            payload: payload.clone(),
            previous: previous.cloned(),
        });
        self.inner.save(client_key, payload, previous).await
    }
}
