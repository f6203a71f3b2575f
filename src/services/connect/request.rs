use axum::http::{HeaderMap, Method, Uri};
use serde_json::Value;

/// The inbound call a handshake runs against.
///
/// `path` and `query` must be the request target as the host platform
/// addressed it (before any router prefix stripping), since the QSH is
/// computed over them.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

impl ConnectRequest {
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Value) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body,
        }
    }

    /// Request without a body (authenticated calls, tests).
    pub fn bodiless(method: Method, uri: &Uri, headers: HeaderMap) -> Self {
        Self::new(method, uri, headers, Value::Null)
    }
}
