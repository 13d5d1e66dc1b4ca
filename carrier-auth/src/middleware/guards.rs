//! Principal type and status guards.
//!
//! A guard chain is a fixed list of checks run in order against the
//! resolved principal; the first failure rejects the request. Chains run
//! behind [`super::auth_middleware`], which must be the outer layer.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::models::{Principal, PrincipalKind};
use crate::services::ServiceError;

pub type Check = fn(&Principal) -> Result<(), ServiceError>;

#[derive(Clone, Copy)]
pub struct GuardChain(&'static [Check]);

impl GuardChain {
    pub const fn new(checks: &'static [Check]) -> Self {
        Self(checks)
    }

    pub fn check(&self, principal: &Principal) -> Result<(), ServiceError> {
        self.0.iter().try_for_each(|check| check(principal))
    }
}

/// Any principal that is not a company.
pub const USER_ONLY: GuardChain = GuardChain::new(&[reject_company]);

pub const COMPANY_ONLY: GuardChain = GuardChain::new(&[require_company]);

/// Moderators whose current status is ACTIVE.
pub const MODERATOR_ONLY: GuardChain =
    GuardChain::new(&[require_moderator, require_active_moderator]);

fn reject_company(principal: &Principal) -> Result<(), ServiceError> {
    if principal.is_company() {
        return Err(ServiceError::WrongPrincipalType(PrincipalKind::User));
    }
    Ok(())
}

fn require_company(principal: &Principal) -> Result<(), ServiceError> {
    if !principal.is_company() {
        return Err(ServiceError::WrongPrincipalType(PrincipalKind::Company));
    }
    Ok(())
}

fn require_moderator(principal: &Principal) -> Result<(), ServiceError> {
    if !principal.is_moderator() {
        return Err(ServiceError::ModeratorRequired);
    }
    Ok(())
}

fn require_active_moderator(principal: &Principal) -> Result<(), ServiceError> {
    match principal.moderator_status() {
        Some(status) if status.is_active() => Ok(()),
        _ => Err(ServiceError::ModeratorInactive),
    }
}

pub async fn require_guards(
    State(chain): State<GuardChain>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = req.extensions().get::<Principal>().ok_or_else(|| {
        AppError::InternalError(anyhow::anyhow!(
            "Guard chain ran before authentication"
        ))
    })?;

    if let Err(e) = chain.check(principal) {
        tracing::warn!(
            principal_type = principal.kind().as_str(),
            principal_id = %principal.id(),
            path = %req.uri().path(),
            error = %e,
            "Guard rejected request"
        );
        return Err(e.into());
    }

    Ok(next.run(req).await)
}
