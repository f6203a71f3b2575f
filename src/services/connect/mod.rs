//! Handshake engine for host-platform signed requests.
//!
//! - `install`: lifecycle payloads (first install, re-install, update)
//! - `authenticate`: calls from installed tenants
//! - `strategy`: both behind one adapter-facing entry-point

pub mod authenticate;
pub mod error;
pub mod install;
pub mod lock;
pub mod qsh;
pub mod request;
pub mod strategy;
pub mod tenant;
pub mod token;

pub use authenticate::{AuthOptions, Authenticated, AuthenticationHandshake};
pub use error::{HandshakeError, HandshakeResult, Rejection};
pub use install::InstallationHandshake;
pub use request::ConnectRequest;
pub use strategy::{ConnectStrategy, OnAuthenticated, Outcome, StrategyConfig};
pub use tenant::{ProductVariant, TenantSelector};
pub use token::{ConnectClaims, UnverifiedClaims};
