use serde::Serialize;

use crate::services::connect::ConnectClaims;

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub client_key: String,
    pub claims: ConnectClaims,
}
