//! Services layer for carrier-auth.
//!
//! Token handling, credential storage, authentication and principal
//! resolution.

mod account;
pub mod auth;
pub mod error;
pub mod jwt;
pub mod metrics;
mod resolver;
pub mod store;

pub use account::AccountService;
pub use auth::{AuthService, NewPrincipal};
pub use error::ServiceError;
pub use jwt::{JwtService, TokenClaims, TokenError};
pub use resolver::PrincipalResolver;
pub use store::{CredentialStore, MemoryCredentialStore, PgCredentialStore, StoreError};
