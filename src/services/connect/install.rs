use std::sync::Arc;

use tracing::{debug, info};

use crate::repos::credential_store::CredentialStore;
use crate::services::connect::error::{HandshakeResult, Rejection};
use crate::services::connect::lock::TenantLocks;
use crate::services::connect::qsh::validate_qsh;
use crate::services::connect::request::ConnectRequest;
use crate::services::connect::tenant::TenantSelector;
use crate::services::connect::token::{
    check_expiry, decode_unverified, decode_verified, extract_token, now_seconds,
};

/// Decides whether an install/update lifecycle payload may be persisted.
///
/// - no stored record: trust-on-first-use, the payload is saved whether or
///   not the request is signed
/// - stored record: the request must carry a token signed with the stored
///   shared secret (and pass expiry + QSH) before the record is replaced
///
/// The load+save pair runs under a per-tenant lock so a first install cannot
/// race an authorized update inside this process.
#[derive(Clone)]
pub struct InstallationHandshake {
    selector: Arc<dyn TenantSelector>,
    store: Arc<dyn CredentialStore>,
    base_url: url::Url,
    locks: Arc<TenantLocks>,
}

impl std::fmt::Debug for InstallationHandshake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationHandshake")
            .field("selector", &self.selector)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl InstallationHandshake {
    pub fn new(
        selector: Arc<dyn TenantSelector>,
        store: Arc<dyn CredentialStore>,
        base_url: url::Url,
    ) -> Self {
        Self {
            selector,
            store,
            base_url,
            locks: Arc::new(TenantLocks::new()),
        }
    }

    /// Share one lock map between several handshakes using the same store.
    pub fn with_locks(mut self, locks: Arc<TenantLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub async fn handle(&self, request: &ConnectRequest) -> HandshakeResult<()> {
        self.handle_at(request, now_seconds()).await
    }

    /// Same as [`handle`](Self::handle) with an explicit clock (seconds since epoch).
    pub async fn handle_at(&self, request: &ConnectRequest, now: i64) -> HandshakeResult<()> {
        let id = self.selector.select_id(&request.body)?;

        let _guard = self.locks.acquire(&id).await;

        let existing = self.store.load(&id).await?;
        let token = extract_token(&request.headers);

        if !token.is_empty() && decode_unverified(token)?.iss.as_deref() != Some(id.as_str()) {
            return Err(Rejection::WrongIssuer.into());
        }

        match existing {
            None => {
                info!(client_key = %id, signed = !token.is_empty(), "first install");
                self.store.save(&id, &request.body, None).await?;
                Ok(())
            }
            Some(existing) if !token.is_empty() => {
                let claims = decode_verified(token, &existing.shared_secret)?;
                check_expiry(&claims, now)?;
                validate_qsh(request, &claims, &self.base_url)?;

                debug!(client_key = %id, "authorized credentials update");
                self.store
                    .save(&id, &request.body, Some(&existing))
                    .await?;
                Ok(())
            }
            Some(_) => Err(Rejection::UnauthorizedUpdate.into()),
        }
    }
}
