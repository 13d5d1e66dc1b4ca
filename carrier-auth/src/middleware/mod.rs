pub mod auth;
pub mod guards;

pub use auth::{auth_middleware, CurrentPrincipal};
pub use guards::{require_guards, GuardChain, COMPANY_ONLY, MODERATOR_ONLY, USER_ONLY};
