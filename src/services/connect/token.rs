//! Token extraction, decoding and expiry checks.
//!
//! Host platform tokens are HS256 JWTs signed with the tenant's shared
//! secret. Only the claims the handshakes consume are typed; everything else
//! is kept in `extra` and handed back to the caller untouched.

use axum::http::{HeaderMap, header};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::services::connect::error::{HandshakeError, HandshakeResult, Rejection};

/// Case-sensitive scheme prefix of the `Authorization` header.
pub const TOKEN_PREFIX: &str = "JWT ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectClaims {
    // Tenant id. Untrusted until the signature is verified.
    pub iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qsh: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Pull the token out of `Authorization: JWT <token>`.
///
/// Missing (or non UTF-8) header yields `""`. A value without the prefix is
/// returned unchanged and will fail decoding later.
pub fn extract_token(headers: &HeaderMap) -> &str {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    raw.strip_prefix(TOKEN_PREFIX).unwrap_or(raw)
}

/// What an unverified token is allowed to tell us.
///
/// `iss` is `None` when the claim is missing or not a string; the handshakes
/// turn that into a rejection, not an infrastructure error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedClaims {
    pub iss: Option<String>,
}

/// Read the claims without checking the signature.
///
/// Only for discovering `iss` as a lookup key. Header and payload must both
/// be base64url JSON objects.
pub fn decode_unverified(token: &str) -> HandshakeResult<UnverifiedClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(HandshakeError::MalformedToken(
            "JWT must have 3 parts separated by dots".into(),
        ));
    }

    decode_segment(parts[0], "header")?;
    let payload = decode_segment(parts[1], "payload")?;

    let iss = payload
        .get("iss")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);

    Ok(UnverifiedClaims { iss })
}

fn decode_segment(
    segment: &str,
    name: &str,
) -> HandshakeResult<serde_json::Map<String, serde_json::Value>> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| HandshakeError::MalformedToken(format!("{name} is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| HandshakeError::MalformedToken(format!("{name} is not a JSON object: {e}")))
}

/// Verify the HS256 signature against `shared_secret` and return the claims.
///
/// `exp` is deliberately not checked here; see [`check_expiry`].
pub fn decode_verified(token: &str, shared_secret: &str) -> HandshakeResult<ConnectClaims> {
    let key = DecodingKey::from_secret(shared_secret.as_bytes());

    jsonwebtoken::decode::<ConnectClaims>(token, &key, &signature_only_validation())
        .map(|data| data.claims)
        .map_err(|e| {
            warn!(error = %e, "connect token verification failed");
            HandshakeError::from(Rejection::InvalidSignature)
        })
}

/// Reject tokens whose `exp` is in the past. A token without `exp` never expires.
pub fn check_expiry(claims: &ConnectClaims, now: i64) -> Result<(), Rejection> {
    match claims.exp {
        Some(exp) if now > exp => Err(Rejection::TokenExpired),
        Some(_) => Ok(()),
        None => {
            debug!(iss = %claims.iss, "token carries no exp claim, treating as non-expiring");
            Ok(())
        }
    }
}

pub fn now_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}

fn signature_only_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // exp/aud/iss are handled by the handshakes, not by jsonwebtoken.
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation.leeway = 0;
    validation
}
