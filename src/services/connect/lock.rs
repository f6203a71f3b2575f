use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-tenant mutual exclusion around the install load+save pair.
///
/// Process-local only. Deployments with several replicas need a conditional
/// write in their `CredentialStore` as well.
#[derive(Debug, Default)]
pub struct TenantLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TenantLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `client_key`. Released on drop.
    pub async fn acquire(&self, client_key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop entries nobody holds or waits on.
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(client_key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
