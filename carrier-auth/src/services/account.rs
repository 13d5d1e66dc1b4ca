//! Profile completion, company verification and moderator administration.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    CompanyResponse, ModeratorResponse, ModeratorUpdate, PrincipalKind, UserResponse,
};
use crate::services::{store::CredentialStore, ServiceError};

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub async fn complete_user_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserResponse, ServiceError> {
        let user = self
            .store
            .complete_user_profile(id, first_name.trim(), last_name.trim())
            .await?
            .ok_or(ServiceError::NotFound(PrincipalKind::User))?;

        tracing::info!(principal_id = %id, "User profile completed");
        Ok(user.sanitized())
    }

    pub async fn complete_company_profile(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<CompanyResponse, ServiceError> {
        let company = self
            .store
            .complete_company_profile(id, name.trim())
            .await?
            .ok_or(ServiceError::NotFound(PrincipalKind::Company))?;

        tracing::info!(
            principal_id = %id,
            status = company.registration_status.as_str(),
            "Company profile completed"
        );
        Ok(company.sanitized())
    }

    pub async fn verify_company(
        &self,
        company_id: Uuid,
        moderator_id: Uuid,
    ) -> Result<CompanyResponse, ServiceError> {
        let company = self
            .store
            .verify_company(company_id, moderator_id, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound(PrincipalKind::Company))?;

        tracing::info!(
            company_id = %company_id,
            moderator_id = %moderator_id,
            "Company verified"
        );
        Ok(company.sanitized())
    }

    pub async fn list_moderators(&self) -> Result<Vec<ModeratorResponse>, ServiceError> {
        let moderators = self.store.list_moderators().await?;
        Ok(moderators.iter().map(|m| m.sanitized()).collect())
    }

    pub async fn get_moderator(&self, id: Uuid) -> Result<ModeratorResponse, ServiceError> {
        self.store
            .find_by_id(PrincipalKind::Moderator, id)
            .await?
            .and_then(|record| match record.sanitized() {
                crate::models::Principal::Moderator(m) => Some(m),
                _ => None,
            })
            .ok_or(ServiceError::NotFound(PrincipalKind::Moderator))
    }

    pub async fn update_moderator(
        &self,
        id: Uuid,
        update: ModeratorUpdate,
        actor: Uuid,
    ) -> Result<ModeratorResponse, ServiceError> {
        let moderator = self
            .store
            .update_moderator(id, &update)
            .await?
            .ok_or(ServiceError::NotFound(PrincipalKind::Moderator))?;

        tracing::info!(
            moderator_id = %id,
            actor_id = %actor,
            status = moderator.status.as_str(),
            role = moderator.role.as_str(),
            "Moderator updated"
        );
        Ok(moderator.sanitized())
    }

    pub async fn delete(&self, kind: PrincipalKind, id: Uuid) -> Result<(), ServiceError> {
        if !self.store.delete(kind, id).await? {
            return Err(ServiceError::NotFound(kind));
        }
        tracing::info!(principal_type = kind.as_str(), principal_id = %id, "Principal deleted");
        Ok(())
    }
}
