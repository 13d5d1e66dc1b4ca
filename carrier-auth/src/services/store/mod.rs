//! Credential store: persistence for the three principal tables.
//!
//! Identity uniqueness is enforced per table only. A user and a company may
//! share an email address.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Company, Moderator, ModeratorUpdate, PrincipalKind, PrincipalRecord, User};

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The identity column already holds this value in the target table.
    #[error("Unique constraint violated")]
    UniqueViolation,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Emails passed in are expected to be normalized already.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> Result<Option<PrincipalRecord>, StoreError>;

    async fn find_by_id(
        &self,
        kind: PrincipalKind,
        id: Uuid,
    ) -> Result<Option<PrincipalRecord>, StoreError>;

    /// Fails with [`StoreError::UniqueViolation`] if the identity is taken
    /// within the record's own table.
    async fn insert(&self, record: &PrincipalRecord) -> Result<(), StoreError>;

    /// Set names and move the profile to COMPLETE.
    async fn complete_user_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Set the name and move to COMPLETE unless already VERIFIED.
    async fn complete_company_profile(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Company>, StoreError>;

    async fn verify_company(
        &self,
        id: Uuid,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Company>, StoreError>;

    async fn list_moderators(&self) -> Result<Vec<Moderator>, StoreError>;

    async fn update_moderator(
        &self,
        id: Uuid,
        update: &ModeratorUpdate,
    ) -> Result<Option<Moderator>, StoreError>;

    /// Increment the login counter and stamp the last-login time in one
    /// atomic update.
    async fn record_moderator_login(&self, id: Uuid, at: DateTime<Utc>)
        -> Result<(), StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, kind: PrincipalKind, id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
