use std::sync::Arc;

use tracing::{error, warn};

use crate::repos::credential_store::{CredentialStore, Credentials};
use crate::services::connect::authenticate::{AuthOptions, Authenticated, AuthenticationHandshake};
use crate::services::connect::error::{HandshakeError, HandshakeResult, Rejection};
use crate::services::connect::install::InstallationHandshake;
use crate::services::connect::lock::TenantLocks;
use crate::services::connect::request::ConnectRequest;
use crate::services::connect::tenant::ProductVariant;
use crate::services::connect::token::ConnectClaims;

/// Minimal knobs for building a strategy.
///
/// Kept separate from `Config` so the handshake layer stays testable.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub product: ProductVariant,
    pub local_base_url: url::Url,
    // If false, protocol rejections are reported as errors too.
    pub handle_known_errors: bool,
}

/// Called once per successfully authenticated request.
pub trait OnAuthenticated: Send + Sync {
    fn on_authenticated(
        &self,
        claims: &ConnectClaims,
        credentials: &Credentials,
        request: &ConnectRequest,
    );
}

impl<F> OnAuthenticated for F
where
    F: Fn(&ConnectClaims, &Credentials, &ConnectRequest) + Send + Sync,
{
    fn on_authenticated(
        &self,
        claims: &ConnectClaims,
        credentials: &Credentials,
        request: &ConnectRequest,
    ) {
        self(claims, credentials, request)
    }
}

/// Adapter-facing result of a strategy run.
#[derive(Debug)]
pub enum Outcome {
    // Install/update accepted; the adapter continues the request.
    Pass,
    Success(Authenticated),
    // Expected protocol rejection with its reportable reason.
    Fail(Rejection),
    Error(HandshakeError),
}

/// Both handshakes behind one entry-point, sharing store and tenant locks.
#[derive(Debug, Clone)]
pub struct ConnectStrategy {
    install: InstallationHandshake,
    authenticate: AuthenticationHandshake,
    handle_known_errors: bool,
}

impl ConnectStrategy {
    pub fn new(config: StrategyConfig, store: Arc<dyn CredentialStore>) -> Self {
        let locks = Arc::new(TenantLocks::new());
        let install = InstallationHandshake::new(
            config.product.selector(),
            store.clone(),
            config.local_base_url.clone(),
        )
        .with_locks(locks);
        let authenticate = AuthenticationHandshake::new(store, config.local_base_url);

        Self {
            install,
            authenticate,
            handle_known_errors: config.handle_known_errors,
        }
    }

    /// Install/update lifecycle call.
    pub async fn install(&self, request: &ConnectRequest) -> Outcome {
        match self.install.handle(request).await {
            Ok(()) => Outcome::Pass,
            Err(e) => self.classify(e),
        }
    }

    /// Authenticated call. `hook` sees the verified claims before they are returned.
    pub async fn authenticate(
        &self,
        request: &ConnectRequest,
        options: AuthOptions,
        hook: &dyn OnAuthenticated,
    ) -> Outcome {
        match self.verify(request, options).await {
            Ok(auth) => {
                hook.on_authenticated(&auth.claims, &auth.credentials, request);
                Outcome::Success(auth)
            }
            Err(e) => self.classify(e),
        }
    }

    pub async fn verify(
        &self,
        request: &ConnectRequest,
        options: AuthOptions,
    ) -> HandshakeResult<Authenticated> {
        self.authenticate.handle(request, options).await
    }

    fn classify(&self, err: HandshakeError) -> Outcome {
        match err.rejection() {
            Some(reason) if self.handle_known_errors => {
                warn!(%reason, "connect request rejected");
                Outcome::Fail(reason)
            }
            _ => {
                error!(error = %err, "connect handshake error");
                Outcome::Error(err)
            }
        }
    }
}
