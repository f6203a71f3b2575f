//! Credential store contract used by the handshakes.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repos::error::{StoreError, StoreResult};

/// Per-tenant credentials established at install time.
///
/// - `client_key` is the tenant id chosen by the `TenantSelector`
/// - `install_payload` is the raw lifecycle body, stored verbatim
/// - records are replaced wholesale, never patched field by field
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_key: String,
    pub shared_secret: String,
    pub install_payload: Value,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("Credentials")
            .field("client_key", &self.client_key)
            .field("shared_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Build a record from an install/update payload.
    ///
    /// The payload must carry a string `sharedSecret`.
    pub fn from_payload(client_key: &str, payload: &Value) -> StoreResult<Self> {
        let shared_secret = payload
            .get("sharedSecret")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(StoreError::InvalidPayload("sharedSecret"))?;

        Ok(Self {
            client_key: client_key.to_string(),
            shared_secret: shared_secret.to_string(),
            install_payload: payload.clone(),
        })
    }
}

/// Persistence contract supplied by the embedding application.
///
/// - `load` returns `Ok(None)` when the tenant was never installed
/// - `save` receives the previously stored record when the write is an
///   authorized update, `None` on first install
/// - both surface backend failures unchanged; the handshakes never retry
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self, client_key: &str) -> StoreResult<Option<Credentials>>;

    async fn save(
        &self,
        client_key: &str,
        payload: &Value,
        previous: Option<&Credentials>,
    ) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_payload_reads_shared_secret() {
        let payload = json!({ "clientKey": "T1", "sharedSecret": "s1" });
        let creds = Credentials::from_payload("T1", &payload).unwrap();

        assert_eq!(creds.client_key, "T1");
        assert_eq!(creds.shared_secret, "s1");
        assert_eq!(creds.install_payload, payload);
    }

    #[test]
    fn from_payload_requires_shared_secret() {
        let err = Credentials::from_payload("T1", &json!({ "clientKey": "T1" })).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPayload("sharedSecret")));
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::from_payload("T1", &json!({ "sharedSecret": "hunter2" })).unwrap();
        let printed = format!("{creds:?}");

        assert!(printed.contains("T1"));
        assert!(!printed.contains("hunter2"));
    }
}
