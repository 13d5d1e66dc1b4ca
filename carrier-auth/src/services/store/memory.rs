use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{CredentialStore, StoreError};
use crate::models::{
    Company, Moderator, ModeratorUpdate, PrincipalKind, PrincipalRecord, ProfileStatus,
    RegistrationStatus, User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    companies: HashMap<Uuid, Company>,
    moderators: HashMap<Uuid, Moderator>,
}

impl Tables {
    fn find(&self, kind: PrincipalKind, id: Uuid) -> Option<PrincipalRecord> {
        match kind {
            PrincipalKind::User => self.users.get(&id).cloned().map(PrincipalRecord::User),
            PrincipalKind::Company => self
                .companies
                .get(&id)
                .cloned()
                .map(PrincipalRecord::Company),
            PrincipalKind::Moderator => self
                .moderators
                .get(&id)
                .cloned()
                .map(PrincipalRecord::Moderator),
        }
    }

    fn find_by_email(&self, kind: PrincipalKind, email: &str) -> Option<PrincipalRecord> {
        match kind {
            PrincipalKind::User => self
                .users
                .values()
                .find(|u| u.email == email)
                .cloned()
                .map(PrincipalRecord::User),
            PrincipalKind::Company => self
                .companies
                .values()
                .find(|c| c.work_email == email)
                .cloned()
                .map(PrincipalRecord::Company),
            PrincipalKind::Moderator => self
                .moderators
                .values()
                .find(|m| m.email == email)
                .cloned()
                .map(PrincipalRecord::Moderator),
        }
    }
}

/// In-process credential store for tests and local development.
#[derive(Default)]
pub struct MemoryCredentialStore {
    tables: Mutex<Tables>,
    fail_login_tracking: AtomicBool,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `record_moderator_login` fail.
    pub fn fail_login_tracking(&self) {
        self.fail_login_tracking.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Memory store mutex poisoned: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> Result<Option<PrincipalRecord>, StoreError> {
        Ok(self.lock()?.find_by_email(kind, email))
    }

    async fn find_by_id(
        &self,
        kind: PrincipalKind,
        id: Uuid,
    ) -> Result<Option<PrincipalRecord>, StoreError> {
        Ok(self.lock()?.find(kind, id))
    }

    async fn insert(&self, record: &PrincipalRecord) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if tables.find_by_email(record.kind(), record.email()).is_some() {
            return Err(StoreError::UniqueViolation);
        }

        match record {
            PrincipalRecord::User(u) => {
                tables.users.insert(u.id, u.clone());
            }
            PrincipalRecord::Company(c) => {
                tables.companies.insert(c.id, c.clone());
            }
            PrincipalRecord::Moderator(m) => {
                tables.moderators.insert(m.id, m.clone());
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
        let mut tables = self.lock()?;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.first_name = first_name.to_string();
            user.last_name = last_name.to_string();
            user.profile_status = ProfileStatus::Complete;
            user.updated_utc = Utc::now();
            user.clone()
        }))
    }

    async fn complete_company_profile(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Company>, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.companies.get_mut(&id).map(|company| {
            company.name = name.to_string();
            company.registration_status = company.registration_status.completed();
            company.clone()
        }))
    }

    async fn verify_company(
        &self,
        id: Uuid,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Company>, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.companies.get_mut(&id).map(|company| {
            company.registration_status = RegistrationStatus::Verified;
            company.is_verified = true;
            company.verified_at = Some(at);
            company.verified_by = Some(verified_by);
            company.clone()
        }))
    }

    async fn list_moderators(&self) -> Result<Vec<Moderator>, StoreError> {
        let mut moderators: Vec<Moderator> = self.lock()?.moderators.values().cloned().collect();
        moderators.sort_by_key(|m| m.created_utc);
        Ok(moderators)
    }

    async fn update_moderator(
        &self,
        id: Uuid,
        update: &ModeratorUpdate,
    ) -> Result<Option<Moderator>, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.moderators.get_mut(&id).map(|moderator| {
            update.apply(moderator);
            moderator.clone()
        }))
    }

    async fn record_moderator_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.fail_login_tracking.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "login tracking disabled".to_string(),
            ));
        }

        let mut tables = self.lock()?;
        if let Some(moderator) = tables.moderators.get_mut(&id) {
            moderator.login_count += 1;
            moderator.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn delete(&self, kind: PrincipalKind, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        let removed = match kind {
            PrincipalKind::User => tables.users.remove(&id).is_some(),
            PrincipalKind::Company => tables.companies.remove(&id).is_some(),
            PrincipalKind::Moderator => tables.moderators.remove(&id).is_some(),
        };
        Ok(removed)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> PrincipalRecord {
        PrincipalRecord::User(User::new(
            email.into(),
            "hash".into(),
            "Ada".into(),
            "Lovelace".into(),
        ))
    }

    fn company(email: &str) -> PrincipalRecord {
        PrincipalRecord::Company(Company::new(email.into(), "hash".into(), "Acme".into()))
    }

    #[tokio::test]
    async fn test_uniqueness_is_per_table() {
        let store = MemoryCredentialStore::new();
        store.insert(&user("a@acme.com")).await.unwrap();
        store.insert(&company("a@acme.com")).await.unwrap();

        let dup = store.insert(&user("a@acme.com")).await;
        assert!(matches!(dup, Err(StoreError::UniqueViolation)));

        let dup = store.insert(&company("a@acme.com")).await;
        assert!(matches!(dup, Err(StoreError::UniqueViolation)));
    }

    #[tokio::test]
    async fn test_find_is_scoped_by_kind() {
        let store = MemoryCredentialStore::new();
        let record = company("a@acme.com");
        store.insert(&record).await.unwrap();

        let found = store
            .find_by_email(PrincipalKind::Company, "a@acme.com")
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id()), Some(record.id()));

        assert!(store
            .find_by_email(PrincipalKind::User, "a@acme.com")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_id(PrincipalKind::Moderator, record.id())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_record_login_increments() {
        let store = MemoryCredentialStore::new();
        let moderator = Moderator::new("m@x.io".into(), "hash".into(), "Mo".into(), "Der".into());
        let id = moderator.id;
        store
            .insert(&PrincipalRecord::Moderator(moderator))
            .await
            .unwrap();

        let at = Utc::now();
        store.record_moderator_login(id, at).await.unwrap();
        store.record_moderator_login(id, at).await.unwrap();

        let Some(PrincipalRecord::Moderator(m)) =
            store.find_by_id(PrincipalKind::Moderator, id).await.unwrap()
        else {
            panic!("moderator missing");
        };
        assert_eq!(m.login_count, 2);
        assert_eq!(m.last_login_at, Some(at));
    }

    #[tokio::test]
    async fn test_company_completion_after_verification() {
        let store = MemoryCredentialStore::new();
        let record = company("a@acme.com");
        store.insert(&record).await.unwrap();

        store
            .verify_company(record.id(), Uuid::new_v4(), Utc::now())
            .await
            .unwrap();
        let company = store
            .complete_company_profile(record.id(), "Acme Freight")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(company.registration_status, RegistrationStatus::Verified);
        assert_eq!(company.name, "Acme Freight");
        assert!(company.is_verified);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let store = MemoryCredentialStore::new();
        let record = user("u@x.io");
        store.insert(&record).await.unwrap();

        assert!(store.delete(PrincipalKind::User, record.id()).await.unwrap());
        assert!(!store.delete(PrincipalKind::User, record.id()).await.unwrap());
    }
}
