//! Moderator model - staff accounts that verify companies and content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UnknownStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeratorRole {
    #[default]
    ContentMod,
    SeniorMod,
    Admin,
}

impl ModeratorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeratorRole::ContentMod => "CONTENT_MOD",
            ModeratorRole::SeniorMod => "SENIOR_MOD",
            ModeratorRole::Admin => "ADMIN",
        }
    }
}

impl FromStr for ModeratorRole {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONTENT_MOD" => Ok(ModeratorRole::ContentMod),
            "SENIOR_MOD" => Ok(ModeratorRole::SeniorMod),
            "ADMIN" => Ok(ModeratorRole::Admin),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Only ACTIVE moderators may log in or pass moderator-only guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeratorStatus {
    Active,
    Inactive,
    Suspended,
}

impl ModeratorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeratorStatus::Active => "ACTIVE",
            ModeratorStatus::Inactive => "INACTIVE",
            ModeratorStatus::Suspended => "SUSPENDED",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ModeratorStatus::Active)
    }
}

impl FromStr for ModeratorStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(ModeratorStatus::Active),
            "INACTIVE" => Ok(ModeratorStatus::Inactive),
            "SUSPENDED" => Ok(ModeratorStatus::Suspended),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Moderator entity.
#[derive(Debug, Clone)]
pub struct Moderator {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: ModeratorRole,
    pub status: ModeratorStatus,
    pub login_count: i32,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl Moderator {
    /// New moderators start ACTIVE with the default role.
    pub fn new(email: String, password_hash: String, first_name: String, last_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name,
            last_name,
            role: ModeratorRole::default(),
            status: ModeratorStatus::Active,
            login_count: 0,
            last_login_at: None,
            created_utc: Utc::now(),
        }
    }

    pub fn sanitized(&self) -> ModeratorResponse {
        ModeratorResponse {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            status: self.status,
            login_count: self.login_count,
            last_login_at: self.last_login_at,
            created_at: self.created_utc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: ModeratorRole,
    pub status: ModeratorStatus,
    pub login_count: i32,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Partial update applied by `PATCH /moderators/:id` and the status routes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeratorUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<ModeratorRole>,
    pub status: Option<ModeratorStatus>,
}

impl ModeratorUpdate {
    pub fn status(status: ModeratorStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply(&self, moderator: &mut Moderator) {
        if let Some(first_name) = &self.first_name {
            moderator.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            moderator.last_name = last_name.clone();
        }
        if let Some(role) = self.role {
            moderator.role = role;
        }
        if let Some(status) = self.status {
            moderator.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_moderator_defaults() {
        let m = Moderator::new("m@x.io".into(), "hash".into(), "Mo".into(), "Der".into());
        assert_eq!(m.role, ModeratorRole::ContentMod);
        assert!(m.status.is_active());
        assert_eq!(m.login_count, 0);
        assert!(m.last_login_at.is_none());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut m = Moderator::new("m@x.io".into(), "hash".into(), "Mo".into(), "Der".into());
        ModeratorUpdate {
            last_name: Some("Rator".into()),
            role: Some(ModeratorRole::Admin),
            ..Default::default()
        }
        .apply(&mut m);
        assert_eq!(m.first_name, "Mo");
        assert_eq!(m.last_name, "Rator");
        assert_eq!(m.role, ModeratorRole::Admin);
        assert_eq!(m.status, ModeratorStatus::Active);
    }

    #[test]
    fn test_status_codes_round_trip_through_text() {
        for status in [
            ModeratorStatus::Active,
            ModeratorStatus::Inactive,
            ModeratorStatus::Suspended,
        ] {
            assert_eq!(status.as_str().parse::<ModeratorStatus>(), Ok(status));
        }
        assert!("PENDING".parse::<ModeratorStatus>().is_err());
    }
}
