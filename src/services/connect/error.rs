use thiserror::Error;

use crate::repos::error::StoreError;

/// Expected protocol outcomes. The `Display` text is the reportable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Missed token")]
    MissingToken,
    #[error("Unknown issuer")]
    UnknownIssuer,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Token expired")]
    TokenExpired,
    #[error("Session invalid")]
    SessionInvalid,
    #[error("Wrong issuer")]
    WrongIssuer,
    #[error("Unauthorized update request")]
    UnauthorizedUpdate,
    #[error("Missing tenant identifier")]
    MissingTenantIdentifier,
}

/// Everything a handshake can fail with.
///
/// `Rejected` is a 401/403-class outcome. The other variants are
/// infrastructure failures (5xx-class).
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("credential store failure: {0}")]
    Store(#[from] StoreError),
}

impl HandshakeError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}

pub type HandshakeResult<T> = Result<T, HandshakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_match_reported_text() {
        let cases = [
            (Rejection::MissingToken, "Missed token"),
            (Rejection::UnknownIssuer, "Unknown issuer"),
            (Rejection::InvalidSignature, "Invalid signature"),
            (Rejection::TokenExpired, "Token expired"),
            (Rejection::SessionInvalid, "Session invalid"),
            (Rejection::WrongIssuer, "Wrong issuer"),
            (Rejection::UnauthorizedUpdate, "Unauthorized update request"),
            (Rejection::MissingTenantIdentifier, "Missing tenant identifier"),
        ];
        for (rejection, text) in cases {
            assert_eq!(rejection.to_string(), text);
            assert_eq!(HandshakeError::from(rejection).to_string(), text);
        }
    }

    #[test]
    fn store_failure_is_not_a_rejection() {
        let err = HandshakeError::from(StoreError::Backend("down".into()));
        assert!(!err.is_rejection());
        assert_eq!(err.rejection(), None);

        let err = HandshakeError::from(Rejection::WrongIssuer);
        assert_eq!(err.rejection(), Some(Rejection::WrongIssuer));
    }
}
