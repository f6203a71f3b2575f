use std::sync::Arc;

use crate::repos::credential_store::{CredentialStore, Credentials};
use crate::services::connect::error::{HandshakeResult, Rejection};
use crate::services::connect::qsh::validate_qsh;
use crate::services::connect::request::ConnectRequest;
use crate::services::connect::token::{
    ConnectClaims, check_expiry, decode_unverified, decode_verified, extract_token, now_seconds,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthOptions {
    // Context tokens issued to the browser are not bound to the request.
    pub skip_qsh: bool,
}

/// Claims that passed signature, expiry and (unless skipped) QSH checks,
/// together with the tenant's stored record.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub claims: ConnectClaims,
    pub credentials: Credentials,
}

/// Verifies a call from an already installed tenant.
///
/// Checks run in a fixed order and the first failure is reported:
/// token present, issuer known, signature, expiry, QSH.
#[derive(Clone)]
pub struct AuthenticationHandshake {
    store: Arc<dyn CredentialStore>,
    base_url: url::Url,
}

impl std::fmt::Debug for AuthenticationHandshake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationHandshake")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl AuthenticationHandshake {
    pub fn new(store: Arc<dyn CredentialStore>, base_url: url::Url) -> Self {
        Self { store, base_url }
    }

    pub async fn handle(
        &self,
        request: &ConnectRequest,
        options: AuthOptions,
    ) -> HandshakeResult<Authenticated> {
        self.handle_at(request, options, now_seconds()).await
    }

    pub async fn handle_at(
        &self,
        request: &ConnectRequest,
        options: AuthOptions,
        now: i64,
    ) -> HandshakeResult<Authenticated> {
        let token = extract_token(&request.headers);
        if token.is_empty() {
            return Err(Rejection::MissingToken.into());
        }

        let Some(id) = decode_unverified(token)?.iss else {
            return Err(Rejection::UnknownIssuer.into());
        };
        let credentials = self
            .store
            .load(&id)
            .await?
            .ok_or(Rejection::UnknownIssuer)?;

        let claims = decode_verified(token, &credentials.shared_secret)?;
        check_expiry(&claims, now)?;

        if !options.skip_qsh {
            validate_qsh(request, &claims, &self.base_url)?;
        }

        Ok(Authenticated {
            claims,
            credentials,
        })
    }
}
