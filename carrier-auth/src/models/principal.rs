//! Principal variants and the per-variant configuration shared by login,
//! registration and principal resolution.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    Company, CompanyResponse, Moderator, ModeratorResponse, ModeratorStatus, User, UserResponse,
};

/// Discriminates the three principal tables. Serialized as the token `type`
/// claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Company,
    Moderator,
}

impl PrincipalKind {
    pub const ALL: [PrincipalKind; 3] = [
        PrincipalKind::User,
        PrincipalKind::Company,
        PrincipalKind::Moderator,
    ];

    /// Value of the token `type` claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Company => "company",
            PrincipalKind::Moderator => "moderator",
        }
    }

    /// Table holding this variant's rows.
    pub fn table(&self) -> &'static str {
        match self {
            PrincipalKind::User => "users",
            PrincipalKind::Company => "companies",
            PrincipalKind::Moderator => "moderators",
        }
    }

    /// Column carrying the unique login identity.
    pub fn identity_column(&self) -> &'static str {
        match self {
            PrincipalKind::User | PrincipalKind::Moderator => "email",
            PrincipalKind::Company => "work_email",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrincipalKind::User => "User",
            PrincipalKind::Company => "Company",
            PrincipalKind::Moderator => "Moderator",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown principal type: {0}")]
pub struct UnknownPrincipalKind(pub String);

impl FromStr for PrincipalKind {
    type Err = UnknownPrincipalKind;

    /// Exact match only; `"User"` or `"admin"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(PrincipalKind::User),
            "company" => Ok(PrincipalKind::Company),
            "moderator" => Ok(PrincipalKind::Moderator),
            other => Err(UnknownPrincipalKind(other.to_string())),
        }
    }
}

/// A stored principal row, password hash included. Never crosses the
/// service boundary; use [`PrincipalRecord::sanitized`].
#[derive(Debug, Clone)]
pub enum PrincipalRecord {
    User(User),
    Company(Company),
    Moderator(Moderator),
}

impl PrincipalRecord {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            PrincipalRecord::User(_) => PrincipalKind::User,
            PrincipalRecord::Company(_) => PrincipalKind::Company,
            PrincipalRecord::Moderator(_) => PrincipalKind::Moderator,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            PrincipalRecord::User(u) => u.id,
            PrincipalRecord::Company(c) => c.id,
            PrincipalRecord::Moderator(m) => m.id,
        }
    }

    /// The unique login identity (work email for companies).
    pub fn email(&self) -> &str {
        match self {
            PrincipalRecord::User(u) => &u.email,
            PrincipalRecord::Company(c) => &c.work_email,
            PrincipalRecord::Moderator(m) => &m.email,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            PrincipalRecord::User(u) => &u.password_hash,
            PrincipalRecord::Company(c) => &c.password_hash,
            PrincipalRecord::Moderator(m) => &m.password_hash,
        }
    }

    pub fn sanitized(&self) -> Principal {
        match self {
            PrincipalRecord::User(u) => Principal::User(u.sanitized()),
            PrincipalRecord::Company(c) => Principal::Company(c.sanitized()),
            PrincipalRecord::Moderator(m) => Principal::Moderator(m.sanitized()),
        }
    }
}

/// A principal as seen outside the credential store: no password hash.
///
/// Serialized externally tagged (`{"company": {...}}`) inside auth responses.
/// Request handlers receive it through [`crate::middleware::CurrentPrincipal`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Principal {
    User(UserResponse),
    Company(CompanyResponse),
    Moderator(ModeratorResponse),
}

impl Principal {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::User(_) => PrincipalKind::User,
            Principal::Company(_) => PrincipalKind::Company,
            Principal::Moderator(_) => PrincipalKind::Moderator,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Principal::User(u) => u.id,
            Principal::Company(c) => c.id,
            Principal::Moderator(m) => m.id,
        }
    }

    pub fn is_company(&self) -> bool {
        matches!(self, Principal::Company(_))
    }

    pub fn is_moderator(&self) -> bool {
        matches!(self, Principal::Moderator(_))
    }

    /// Live moderator status as of resolution; `None` for other variants.
    pub fn moderator_status(&self) -> Option<ModeratorStatus> {
        match self {
            Principal::Moderator(m) => Some(m.status),
            _ => None,
        }
    }

    /// Flat representation with the discriminator flag, as returned by
    /// `GET /auth/profile`.
    pub fn with_flags(&self) -> FlaggedPrincipal<'_> {
        FlaggedPrincipal(self)
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "lowercase")]
        enum Tagged<'a> {
            User(&'a UserResponse),
            Company(&'a CompanyResponse),
            Moderator(&'a ModeratorResponse),
        }

        match self {
            Principal::User(u) => Tagged::User(u),
            Principal::Company(c) => Tagged::Company(c),
            Principal::Moderator(m) => Tagged::Moderator(m),
        }
        .serialize(serializer)
    }
}

/// Serializes a principal's fields flat, plus `isCompany: true` or
/// `isModerator: true`. A plain user carries neither flag.
pub struct FlaggedPrincipal<'a>(&'a Principal);

impl Serialize for FlaggedPrincipal<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Flagged<'a, T> {
            #[serde(flatten)]
            inner: &'a T,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_company: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_moderator: Option<bool>,
        }

        match self.0 {
            Principal::User(u) => Flagged {
                inner: u,
                is_company: None,
                is_moderator: None,
            }
            .serialize(serializer),
            Principal::Company(c) => Flagged {
                inner: c,
                is_company: Some(true),
                is_moderator: None,
            }
            .serialize(serializer),
            Principal::Moderator(m) => Flagged {
                inner: m,
                is_company: None,
                is_moderator: Some(true),
            }
            .serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModeratorRole, ProfileStatus, RegistrationStatus};
    use chrono::Utc;

    fn company() -> CompanyResponse {
        CompanyResponse {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            email: "a@acme.com".to_string(),
            registration_status: RegistrationStatus::Initial,
            is_verified: false,
            verified_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_parsing_is_exact() {
        for kind in PrincipalKind::ALL {
            assert_eq!(kind.as_str().parse::<PrincipalKind>(), Ok(kind));
        }
        assert!("admin".parse::<PrincipalKind>().is_err());
        assert!("User".parse::<PrincipalKind>().is_err());
        assert!("".parse::<PrincipalKind>().is_err());
    }

    #[test]
    fn test_identity_column_per_kind() {
        assert_eq!(PrincipalKind::User.identity_column(), "email");
        assert_eq!(PrincipalKind::Company.identity_column(), "work_email");
        assert_eq!(PrincipalKind::Moderator.identity_column(), "email");
    }

    #[test]
    fn test_principal_serializes_tagged() {
        let principal = Principal::Company(company());
        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json["company"]["email"], "a@acme.com");
        assert_eq!(json["company"]["registrationStatus"], "INITIAL");
    }

    #[test]
    fn test_flags_exactly_one_discriminator() {
        let company = Principal::Company(company());
        let json = serde_json::to_value(company.with_flags()).unwrap();
        assert_eq!(json["isCompany"], true);
        assert!(json.get("isModerator").is_none());
        assert_eq!(json["name"], "Acme");

        let user = Principal::User(UserResponse {
            id: Uuid::new_v4(),
            email: "u@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            registration_status: ProfileStatus::Initial,
            created_at: Utc::now(),
        });
        let json = serde_json::to_value(user.with_flags()).unwrap();
        assert!(json.get("isCompany").is_none());
        assert!(json.get("isModerator").is_none());

        let moderator = Principal::Moderator(ModeratorResponse {
            id: Uuid::new_v4(),
            email: "m@example.com".to_string(),
            first_name: "Mo".to_string(),
            last_name: "Der".to_string(),
            role: ModeratorRole::ContentMod,
            status: ModeratorStatus::Active,
            login_count: 0,
            last_login_at: None,
            created_at: Utc::now(),
        });
        let json = serde_json::to_value(moderator.with_flags()).unwrap();
        assert_eq!(json["isModerator"], true);
        assert!(json.get("isCompany").is_none());
        assert_eq!(json["role"], "CONTENT_MOD");
    }
}
