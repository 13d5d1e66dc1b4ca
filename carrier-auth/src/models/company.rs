//! Company model - carriers listed on the marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UnknownStatus;

/// Company registration status. VERIFIED is set by a moderator and is
/// terminal with respect to profile completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Initial,
    Complete,
    Verified,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Initial => "INITIAL",
            RegistrationStatus::Complete => "COMPLETE",
            RegistrationStatus::Verified => "VERIFIED",
        }
    }

    /// Status after a profile-completion call.
    pub fn completed(self) -> Self {
        match self {
            RegistrationStatus::Verified => RegistrationStatus::Verified,
            _ => RegistrationStatus::Complete,
        }
    }
}

impl FromStr for RegistrationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIAL" => Ok(RegistrationStatus::Initial),
            "COMPLETE" => Ok(RegistrationStatus::Complete),
            "VERIFIED" => Ok(RegistrationStatus::Verified),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Company entity. `work_email` is the login identity.
#[derive(Debug, Clone)]
pub struct Company {
    pub id: Uuid,
    pub work_email: String,
    pub password_hash: String,
    pub name: String,
    pub registration_status: RegistrationStatus,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<Uuid>,
    pub created_utc: DateTime<Utc>,
}

impl Company {
    pub fn new(work_email: String, password_hash: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            work_email,
            password_hash,
            name,
            registration_status: RegistrationStatus::Initial,
            is_verified: false,
            verified_at: None,
            verified_by: None,
            created_utc: Utc::now(),
        }
    }

    pub fn sanitized(&self) -> CompanyResponse {
        CompanyResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.work_email.clone(),
            registration_status: self.registration_status,
            is_verified: self.is_verified,
            verified_at: self.verified_at,
            created_at: self.created_utc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub registration_status: RegistrationStatus,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
