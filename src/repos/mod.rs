pub mod credential_store;
pub mod error;
pub mod memory;
pub mod pg;

pub use credential_store::{CredentialStore, Credentials};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryCredentialStore;
pub use pg::PgCredentialStore;
