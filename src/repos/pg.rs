use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, types::Json};

use crate::repos::credential_store::{CredentialStore, Credentials};
use crate::repos::error::StoreResult;

/// Postgres-backed credential store.
///
/// Notes:
/// - The schema is assumed to have at least these columns:
///   - connect_tenants.client_key (text, primary key)
///   - connect_tenants.shared_secret (text)
///   - connect_tenants.install_payload (jsonb)
///   - connect_tenants.updated_at (timestamptz)
/// - `save` is a plain upsert. Serializing concurrent installs of one tenant is
///   the caller's job (see `TenantLocks`); this is not a compare-and-swap.
#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    client_key: String,
    shared_secret: String,
    install_payload: Json<Value>,
}

impl From<TenantRow> for Credentials {
    fn from(row: TenantRow) -> Self {
        Self {
            client_key: row.client_key,
            shared_secret: row.shared_secret,
            install_payload: row.install_payload.0,
        }
    }
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Apply `migrations/` (creates `connect_tenants`).
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn load(&self, client_key: &str) -> StoreResult<Option<Credentials>> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT client_key, shared_secret, install_payload
            FROM connect_tenants
            WHERE client_key = $1
            "#,
        )
        .bind(client_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Credentials::from))
    }

    async fn save(
        &self,
        client_key: &str,
        payload: &Value,
        previous: Option<&Credentials>,
    ) -> StoreResult<()> {
        let creds = Credentials::from_payload(client_key, payload)?;

        tracing::debug!(
            client_key,
            update = previous.is_some(),
            "persisting connect credentials"
        );

        sqlx::query(
            r#"
            INSERT INTO connect_tenants (client_key, shared_secret, install_payload, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (client_key) DO UPDATE
                SET shared_secret = EXCLUDED.shared_secret,
                    install_payload = EXCLUDED.install_payload,
                    updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&creds.client_key)
        .bind(&creds.shared_secret)
        .bind(Json(&creds.install_payload))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
