//! PostgreSQL credential store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{FromRow, Row};
use std::str::FromStr;
use uuid::Uuid;

use super::{CredentialStore, StoreError};
use crate::models::{
    Company, Moderator, ModeratorUpdate, PrincipalKind, PrincipalRecord, User,
};

/// Decode a TEXT status column into its enum.
fn status_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = crate::models::UnknownStatus>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            profile_status: status_column(row, "profile_status")?,
            created_utc: row.try_get("created_utc")?,
            updated_utc: row.try_get("updated_utc")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Company {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            work_email: row.try_get("work_email")?,
            password_hash: row.try_get("password_hash")?,
            name: row.try_get("name")?,
            registration_status: status_column(row, "registration_status")?,
            is_verified: row.try_get("is_verified")?,
            verified_at: row.try_get("verified_at")?,
            verified_by: row.try_get("verified_by")?,
            created_utc: row.try_get("created_utc")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Moderator {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            role: status_column(row, "role")?,
            status: status_column(row, "status")?,
            login_count: row.try_get("login_count")?,
            last_login_at: row.try_get("last_login_at")?,
            created_utc: row.try_get("created_utc")?,
        })
    }
}

/// Credential store backed by the `users`, `companies` and `moderators`
/// tables.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> Result<Option<PrincipalRecord>, StoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1",
            kind.table(),
            kind.identity_column()
        );

        let record = match kind {
            PrincipalKind::User => sqlx::query_as::<_, User>(&sql)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?
                .map(PrincipalRecord::User),
            PrincipalKind::Company => sqlx::query_as::<_, Company>(&sql)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?
                .map(PrincipalRecord::Company),
            PrincipalKind::Moderator => sqlx::query_as::<_, Moderator>(&sql)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?
                .map(PrincipalRecord::Moderator),
        };
        Ok(record)
    }

    async fn find_by_id(
        &self,
        kind: PrincipalKind,
        id: Uuid,
    ) -> Result<Option<PrincipalRecord>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", kind.table());

        let record = match kind {
            PrincipalKind::User => sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(PrincipalRecord::User),
            PrincipalKind::Company => sqlx::query_as::<_, Company>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(PrincipalRecord::Company),
            PrincipalKind::Moderator => sqlx::query_as::<_, Moderator>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(PrincipalRecord::Moderator),
        };
        Ok(record)
    }

    async fn insert(&self, record: &PrincipalRecord) -> Result<(), StoreError> {
        match record {
            PrincipalRecord::User(u) => {
                sqlx::query(
                    r#"
                    INSERT INTO users
                        (id, email, password_hash, first_name, last_name, profile_status, created_utc, updated_utc)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(u.id)
                .bind(&u.email)
                .bind(&u.password_hash)
                .bind(&u.first_name)
                .bind(&u.last_name)
                .bind(u.profile_status.as_str())
                .bind(u.created_utc)
                .bind(u.updated_utc)
                .execute(&self.pool)
                .await?;
            }
            PrincipalRecord::Company(c) => {
                sqlx::query(
                    r#"
                    INSERT INTO companies
                        (id, work_email, password_hash, name, registration_status, is_verified, verified_at, verified_by, created_utc)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    "#,
                )
                .bind(c.id)
                .bind(&c.work_email)
                .bind(&c.password_hash)
                .bind(&c.name)
                .bind(c.registration_status.as_str())
                .bind(c.is_verified)
                .bind(c.verified_at)
                .bind(c.verified_by)
                .bind(c.created_utc)
                .execute(&self.pool)
                .await?;
            }
            PrincipalRecord::Moderator(m) => {
                sqlx::query(
                    r#"
                    INSERT INTO moderators
                        (id, email, password_hash, first_name, last_name, role, status, login_count, last_login_at, created_utc)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(m.id)
                .bind(&m.email)
                .bind(&m.password_hash)
                .bind(&m.first_name)
                .bind(&m.last_name)
                .bind(m.role.as_str())
                .bind(m.status.as_str())
                .bind(m.login_count)
                .bind(m.last_login_at)
                .bind(m.created_utc)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    async fn complete_user_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, profile_status = 'COMPLETE', updated_utc = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn complete_company_profile(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Company>, StoreError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2,
                registration_status = CASE
                    WHEN registration_status = 'VERIFIED' THEN 'VERIFIED'
                    ELSE 'COMPLETE'
                END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn verify_company(
        &self,
        id: Uuid,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Company>, StoreError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET registration_status = 'VERIFIED', is_verified = TRUE, verified_at = $2, verified_by = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(at)
        .bind(verified_by)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn list_moderators(&self) -> Result<Vec<Moderator>, StoreError> {
        let moderators =
            sqlx::query_as::<_, Moderator>("SELECT * FROM moderators ORDER BY created_utc")
                .fetch_all(&self.pool)
                .await?;
        Ok(moderators)
    }

    async fn update_moderator(
        &self,
        id: Uuid,
        update: &ModeratorUpdate,
    ) -> Result<Option<Moderator>, StoreError> {
        let moderator = sqlx::query_as::<_, Moderator>(
            r#"
            UPDATE moderators
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                role = COALESCE($4, role),
                status = COALESCE($5, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.role.map(|r| r.as_str()))
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(moderator)
    }

    async fn record_moderator_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE moderators SET login_count = login_count + 1, last_login_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, kind: PrincipalKind, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}
