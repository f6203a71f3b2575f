use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::services::connect::error::Rejection;

/// Host platform product the app is installed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductVariant {
    Jira,
    Confluence,
    Bitbucket,
}

impl ProductVariant {
    /// Pick the tenant id policy for this product. Done once, at construction.
    pub fn selector(self) -> Arc<dyn TenantSelector> {
        match self {
            Self::Jira | Self::Confluence => Arc::new(ClientKeySelector),
            Self::Bitbucket => Arc::new(PrincipalUuidSelector),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown product: {0}")]
pub struct UnknownProduct(pub String);

impl FromStr for ProductVariant {
    type Err = UnknownProduct;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jira" => Ok(Self::Jira),
            "confluence" => Ok(Self::Confluence),
            "bitbucket" => Ok(Self::Bitbucket),
            other => Err(UnknownProduct(other.to_string())),
        }
    }
}

/// Derives the tenant id from an install/update payload.
pub trait TenantSelector: Send + Sync + fmt::Debug {
    fn select_id(&self, payload: &Value) -> Result<String, Rejection>;
}

/// `payload.clientKey` (Jira, Confluence).
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientKeySelector;

impl TenantSelector for ClientKeySelector {
    fn select_id(&self, payload: &Value) -> Result<String, Rejection> {
        non_empty_str(payload.get("clientKey"))
    }
}

/// `payload.principal.uuid` (Bitbucket).
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalUuidSelector;

impl TenantSelector for PrincipalUuidSelector {
    fn select_id(&self, payload: &Value) -> Result<String, Rejection> {
        non_empty_str(payload.get("principal").and_then(|p| p.get("uuid")))
    }
}

fn non_empty_str(value: Option<&Value>) -> Result<String, Rejection> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(Rejection::MissingTenantIdentifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_key_selector() {
        let selector = ProductVariant::Jira.selector();
        assert_eq!(
            selector.select_id(&json!({ "clientKey": "T1" })).unwrap(),
            "T1"
        );
        assert_eq!(
            selector.select_id(&json!({ "principal": { "uuid": "T1" } })),
            Err(Rejection::MissingTenantIdentifier)
        );
    }

    #[test]
    fn principal_uuid_selector() {
        let selector = ProductVariant::Bitbucket.selector();
        assert_eq!(
            selector
                .select_id(&json!({ "principal": { "uuid": "{abc}" }, "clientKey": "other" }))
                .unwrap(),
            "{abc}"
        );
        assert_eq!(
            selector.select_id(&json!({ "clientKey": "T1" })),
            Err(Rejection::MissingTenantIdentifier)
        );
    }

    #[test]
    fn selector_rejects_non_string_and_empty() {
        let selector = ClientKeySelector;
        for payload in [json!({ "clientKey": 42 }), json!({ "clientKey": "" }), json!(null)] {
            assert_eq!(
                selector.select_id(&payload),
                Err(Rejection::MissingTenantIdentifier)
            );
        }
    }

    #[test]
    fn product_parses_case_insensitively() {
        assert_eq!("Bitbucket".parse(), Ok(ProductVariant::Bitbucket));
        assert_eq!(" confluence ".parse(), Ok(ProductVariant::Confluence));
        assert_eq!(
            "trello".parse::<ProductVariant>(),
            Err(UnknownProduct("trello".into()))
        );
        assert_eq!(
            UnknownProduct("trello".into()).to_string(),
            "unknown product: trello"
        );
    }
}
