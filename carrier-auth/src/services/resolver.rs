use crate::models::{Principal, PrincipalKind};
use crate::services::{jwt::TokenClaims, AuthService, ServiceError};

/// Turns verified token claims into a live principal.
///
/// Every type, moderators included, is re-fetched from the credential store
/// so that a status change after issuance takes effect on the next request.
#[derive(Clone)]
pub struct PrincipalResolver {
    auth: AuthService,
}

impl PrincipalResolver {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }

    pub async fn resolve(&self, claims: &TokenClaims) -> Result<Principal, ServiceError> {
        let kind: PrincipalKind = claims
            .principal_type
            .parse()
            .map_err(|_| ServiceError::InvalidTokenType)?;

        self.auth
            .validate(&claims.sub, kind)
            .await?
            .ok_or(ServiceError::PrincipalNotFound(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::dtos::auth::{RegisterModeratorRequest, RegisterUserRequest};
    use crate::models::{ModeratorStatus, ModeratorUpdate};
    use crate::services::auth::NewPrincipal;
    use crate::services::store::{CredentialStore, MemoryCredentialStore};
    use crate::services::JwtService;
    use std::sync::Arc;
    use uuid::Uuid;

    fn setup() -> (AuthService, PrincipalResolver, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new());
        let jwt = JwtService::new(&JwtConfig {
            secret: "unit-test-secret-that-is-long-enough".to_string(),
            expiry_minutes: 60,
            leeway_seconds: 0,
        });
        let auth = AuthService::new(store.clone(), jwt);
        (auth.clone(), PrincipalResolver::new(auth), store)
    }

    fn claims(sub: &str, principal_type: &str) -> TokenClaims {
        TokenClaims {
            sub: sub.to_string(),
            email: "x@example.com".to_string(),
            principal_type: principal_type.to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_type_is_rejected() {
        let (_, resolver, _) = setup();
        let err = resolver
            .resolve(&claims(&Uuid::new_v4().to_string(), "admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTokenType));
    }

    #[tokio::test]
    async fn test_missing_principal_is_rejected() {
        let (_, resolver, _) = setup();
        let err = resolver
            .resolve(&claims(&Uuid::new_v4().to_string(), "company"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::PrincipalNotFound(PrincipalKind::Company)
        ));
    }

    #[tokio::test]
    async fn test_user_resolves_without_flags() {
        let (auth, resolver, _) = setup();
        let registered = auth
            .register(NewPrincipal::User(RegisterUserRequest {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "ada@x.io".into(),
                password: "longenough1".into(),
            }))
            .await
            .unwrap();

        let principal = resolver
            .resolve(&claims(&registered.principal.id().to_string(), "user"))
            .await
            .unwrap();
        assert!(!principal.is_company());
        assert!(!principal.is_moderator());
    }

    #[tokio::test]
    async fn test_moderator_status_is_read_live() {
        let (auth, resolver, store) = setup();
        let registered = auth
            .register(NewPrincipal::Moderator(RegisterModeratorRequest {
                first_name: "Morgan".into(),
                last_name: "Reyes".into(),
                email: "morgan@x.io".into(),
                password: "secret1".into(),
            }))
            .await
            .unwrap();
        let id = registered.principal.id();

        store
            .update_moderator(id, &ModeratorUpdate::status(ModeratorStatus::Suspended))
            .await
            .unwrap();

        let principal = resolver
            .resolve(&claims(&id.to_string(), "moderator"))
            .await
            .unwrap();
        assert!(principal.is_moderator());
        assert_eq!(
            principal.moderator_status(),
            Some(ModeratorStatus::Suspended)
        );
    }
}
