//! Query string hash (QSH): binds a token to one HTTP request.
//!
//! canonical = UPPER(method) "&" canonical_path "&" canonical_query
//! qsh       = hex(sha256(canonical))

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::services::connect::error::Rejection;
use crate::services::connect::request::ConnectRequest;
use crate::services::connect::token::ConnectClaims;

const QUERY_SEPARATOR: &str = "&";
const ENCODED_QUERY_SEPARATOR: &str = "%26";

// RFC 3986 unreserved characters stay as-is.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Compare the token's `qsh` claim with the hash of `request`.
///
/// Tokens without `qsh` pass. That fallback exists for tokens that predate
/// request binding and weakens replay protection for them.
pub fn validate_qsh(
    request: &ConnectRequest,
    claims: &ConnectClaims,
    base_url: &url::Url,
) -> Result<(), Rejection> {
    let Some(expected) = claims.qsh.as_deref() else {
        debug!(iss = %claims.iss, "token carries no qsh claim, skipping request binding");
        return Ok(());
    };

    let actual = query_string_hash(
        request.method.as_str(),
        &request.path,
        request.query.as_deref(),
        base_url,
    );

    if actual != expected {
        debug!(iss = %claims.iss, "qsh mismatch");
        return Err(Rejection::SessionInvalid);
    }

    Ok(())
}

pub fn query_string_hash(
    method: &str,
    path: &str,
    query: Option<&str>,
    base_url: &url::Url,
) -> String {
    let canonical = canonical_request(method, path, query, base_url);
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

pub fn canonical_request(
    method: &str,
    path: &str,
    query: Option<&str>,
    base_url: &url::Url,
) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        canonical_path(path, base_url),
        canonical_query(query.unwrap_or(""))
    )
}

fn canonical_path(path: &str, base_url: &url::Url) -> String {
    let base_path = base_url.path();
    let path = path.strip_prefix(base_path).unwrap_or(path);

    if path.is_empty() {
        return "/".to_string();
    }

    // Unencoded '&' in the path would collide with the separator.
    let mut path = path.replace(QUERY_SEPARATOR, ENCODED_QUERY_SEPARATOR);

    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

fn canonical_query(query: &str) -> String {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key == "jwt" {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    params
        .into_iter()
        .map(|(key, mut values)| {
            values.sort();
            let joined = values
                .iter()
                .map(|v| encode(v))
                .collect::<Vec<_>>()
                .join(",");
            format!("{}={}", encode(&key), joined)
        })
        .collect::<Vec<_>>()
        .join(QUERY_SEPARATOR)
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}
