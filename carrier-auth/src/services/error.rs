use service_core::error::AppError;
use thiserror::Error;

use crate::models::PrincipalKind;
use crate::services::jwt::TokenError;
use crate::services::store::StoreError;
use crate::utils::PasswordError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Unknown account and wrong password collapse into this one variant.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid token type")]
    InvalidTokenType,

    #[error("{0} not found for token")]
    PrincipalNotFound(PrincipalKind),

    #[error("{0} account required")]
    WrongPrincipalType(PrincipalKind),

    #[error("Moderator access required")]
    ModeratorRequired,

    #[error("Moderator account is not active")]
    ModeratorInactive,

    #[error("{0} already exists")]
    AlreadyExists(PrincipalKind),

    #[error("{0} not found")]
    NotFound(PrincipalKind),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ServiceError::TokenExpired,
            TokenError::InvalidSignature | TokenError::Malformed(_) => ServiceError::InvalidToken,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials
            | ServiceError::MissingToken
            | ServiceError::TokenExpired
            | ServiceError::InvalidToken
            | ServiceError::InvalidTokenType
            | ServiceError::PrincipalNotFound(_)
            | ServiceError::WrongPrincipalType(_) => AppError::Unauthorized(anyhow::anyhow!(err)),
            ServiceError::ModeratorRequired | ServiceError::ModeratorInactive => {
                AppError::Forbidden(anyhow::anyhow!(err))
            }
            ServiceError::AlreadyExists(_) => AppError::Conflict(anyhow::anyhow!(err)),
            ServiceError::NotFound(_) => AppError::NotFound(anyhow::anyhow!(err)),
            ServiceError::Password(e) if e.is_input_error() => {
                AppError::BadRequest(anyhow::anyhow!(e))
            }
            ServiceError::Password(e) => AppError::InternalError(anyhow::anyhow!(e)),
            ServiceError::Store(StoreError::Unavailable(msg)) => {
                tracing::error!(error = %msg, "Credential store unavailable");
                AppError::ServiceUnavailable
            }
            ServiceError::Store(e) => AppError::DatabaseError(anyhow::anyhow!(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status(err: ServiceError) -> StatusCode {
        AppError::from(err).status()
    }

    #[test]
    fn test_auth_failures_are_401() {
        assert_eq!(status(ServiceError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ServiceError::MissingToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ServiceError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ServiceError::InvalidTokenType), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(ServiceError::WrongPrincipalType(PrincipalKind::Company)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_moderator_gates_are_403() {
        assert_eq!(status(ServiceError::ModeratorRequired), StatusCode::FORBIDDEN);
        assert_eq!(status(ServiceError::ModeratorInactive), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_and_not_found() {
        assert_eq!(
            status(ServiceError::AlreadyExists(PrincipalKind::User)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(ServiceError::NotFound(PrincipalKind::Moderator)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_password_errors_split_by_cause() {
        assert_eq!(
            status(ServiceError::Password(PasswordError::Empty)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(ServiceError::Password(PasswordError::Hash("boom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            ServiceError::from(TokenError::Expired),
            ServiceError::TokenExpired
        ));
        assert!(matches!(
            ServiceError::from(TokenError::InvalidSignature),
            ServiceError::InvalidToken
        ));
    }
}
