pub mod company;
pub mod moderator;
pub mod principal;
pub mod user;

pub use company::{Company, CompanyResponse, RegistrationStatus};
pub use moderator::{Moderator, ModeratorResponse, ModeratorRole, ModeratorStatus, ModeratorUpdate};
pub use principal::{FlaggedPrincipal, Principal, PrincipalKind, PrincipalRecord, UnknownPrincipalKind};
pub use user::{ProfileStatus, User, UserResponse};

/// A status or role code read from storage that this build does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status code: {0}")]
pub struct UnknownStatus(pub String);
