use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::repos::credential_store::{CredentialStore, Credentials};
use crate::repos::error::StoreResult;

/// Process-local store, used by the binary when no `DATABASE_URL` is set and by tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    tenants: RwLock<HashMap<String, Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tenants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tenants.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self, client_key: &str) -> StoreResult<Option<Credentials>> {
        Ok(self.tenants.read().await.get(client_key).cloned())
    }

    async fn save(
        &self,
        client_key: &str,
        payload: &Value,
        _previous: Option<&Credentials>,
    ) -> StoreResult<()> {
        let creds = Credentials::from_payload(client_key, payload)?;
        self.tenants
            .write()
            .await
            .insert(client_key.to_string(), creds);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn save_replaces_whole_record() {
        let store = MemoryCredentialStore::new();
        store
            .save("T1", &json!({ "clientKey": "T1", "sharedSecret": "s1", "baseUrl": "a" }), None)
            .await
            .unwrap();
        let first = store.load("T1").await.unwrap().unwrap();

        store
            .save("T1", &json!({ "clientKey": "T1", "sharedSecret": "s2" }), Some(&first))
            .await
            .unwrap();
        let second = store.load("T1").await.unwrap().unwrap();

        assert_eq!(second.shared_secret, "s2");
        assert!(second.install_payload.get("baseUrl").is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn load_unknown_is_none() {
        let store = MemoryCredentialStore::new();
        assert!(store.load("nobody").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
