use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    dtos::auth::{
        AuthResponse, LoginRequest, RegisterCompanyRequest, RegisterModeratorRequest,
        RegisterUserRequest,
    },
    models::{Company, Moderator, Principal, PrincipalKind, PrincipalRecord, User},
    services::{
        jwt::{JwtService, TokenClaims},
        metrics::{self, Outcome},
        store::{CredentialStore, StoreError},
        ServiceError,
    },
    utils::{hash_password, normalize_email, verify_dummy, verify_password, Password},
};

/// Registration payload for any principal type.
#[derive(Debug)]
pub enum NewPrincipal {
    User(RegisterUserRequest),
    Company(RegisterCompanyRequest),
    Moderator(RegisterModeratorRequest),
}

impl NewPrincipal {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            NewPrincipal::User(_) => PrincipalKind::User,
            NewPrincipal::Company(_) => PrincipalKind::Company,
            NewPrincipal::Moderator(_) => PrincipalKind::Moderator,
        }
    }

    fn password(&self) -> Password {
        let raw = match self {
            NewPrincipal::User(r) => &r.password,
            NewPrincipal::Company(r) => &r.password,
            NewPrincipal::Moderator(r) => &r.password,
        };
        Password::new(raw.as_str())
    }

    fn email(&self) -> String {
        let raw = match self {
            NewPrincipal::User(r) => &r.email,
            NewPrincipal::Company(r) => &r.work_email,
            NewPrincipal::Moderator(r) => &r.email,
        };
        normalize_email(raw)
    }

    /// Build the row with the variant's initial status.
    fn into_record(self, email: String, password_hash: String) -> PrincipalRecord {
        match self {
            NewPrincipal::User(r) => PrincipalRecord::User(User::new(
                email,
                password_hash,
                r.first_name.trim().to_string(),
                r.last_name.trim().to_string(),
            )),
            NewPrincipal::Company(r) => PrincipalRecord::Company(Company::new(
                email,
                password_hash,
                r.name.trim().to_string(),
            )),
            // TODO: start moderators INACTIVE pending PATCH /moderators/:id/approve.
            NewPrincipal::Moderator(r) => PrincipalRecord::Moderator(Moderator::new(
                email,
                password_hash,
                r.first_name.trim().to_string(),
                r.last_name.trim().to_string(),
            )),
        }
    }
}

/// Login, registration and principal lookup for all three principal types.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt: JwtService) -> Self {
        Self { store, jwt }
    }

    pub async fn login(
        &self,
        kind: PrincipalKind,
        req: &LoginRequest,
    ) -> Result<AuthResponse, ServiceError> {
        let result = self.authenticate(kind, req).await;
        match &result {
            Ok(response) => {
                metrics::record_login(kind, Outcome::Success);
                tracing::info!(
                    principal_type = kind.as_str(),
                    principal_id = %response.principal.id(),
                    "Login successful"
                );
            }
            Err(e) => {
                metrics::record_login(kind, Outcome::Failure);
                tracing::warn!(principal_type = kind.as_str(), error = %e, "Login failed");
            }
        }
        result
    }

    async fn authenticate(
        &self,
        kind: PrincipalKind,
        req: &LoginRequest,
    ) -> Result<AuthResponse, ServiceError> {
        let email = normalize_email(&req.email);
        let password = Password::new(req.password.as_str());
        let Some(mut record) = self.store.find_by_email(kind, &email).await? else {
            // Unknown accounts pay for one Argon2 verification too.
            verify_dummy(&password);
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(&password, record.password_hash()) {
            return Err(ServiceError::InvalidCredentials);
        }

        if let PrincipalRecord::Moderator(moderator) = &mut record {
            // Inactive and suspended moderators get the same error as a bad password.
            if !moderator.status.is_active() {
                return Err(ServiceError::InvalidCredentials);
            }
            self.track_moderator_login(moderator).await;
        }

        self.respond(record.sanitized())
    }

    /// Best effort: a failed update is logged and never fails the login.
    async fn track_moderator_login(&self, moderator: &mut Moderator) {
        let at = Utc::now();
        match self.store.record_moderator_login(moderator.id, at).await {
            Ok(()) => {
                moderator.login_count += 1;
                moderator.last_login_at = Some(at);
            }
            Err(e) => {
                tracing::warn!(
                    principal_id = %moderator.id,
                    error = %e,
                    "Failed to record moderator login"
                );
            }
        }
    }

    pub async fn register(&self, req: NewPrincipal) -> Result<AuthResponse, ServiceError> {
        let kind = req.kind();
        let result = self.create(req).await;
        match &result {
            Ok(response) => {
                metrics::record_registration(kind, Outcome::Success);
                tracing::info!(
                    principal_type = kind.as_str(),
                    principal_id = %response.principal.id(),
                    "Principal registered"
                );
            }
            Err(e) => {
                metrics::record_registration(kind, Outcome::Failure);
                tracing::warn!(principal_type = kind.as_str(), error = %e, "Registration failed");
            }
        }
        result
    }

    async fn create(&self, req: NewPrincipal) -> Result<AuthResponse, ServiceError> {
        let kind = req.kind();
        let email = req.email();
        let password_hash = hash_password(&req.password())?;
        let record = req.into_record(email, password_hash.into_string());

        self.store.insert(&record).await.map_err(|e| match e {
            StoreError::UniqueViolation => ServiceError::AlreadyExists(kind),
            other => ServiceError::Store(other),
        })?;

        self.respond(record.sanitized())
    }

    /// Re-fetch a principal by token subject. An unparseable or unknown id
    /// yields `None`.
    pub async fn validate(
        &self,
        subject_id: &str,
        kind: PrincipalKind,
    ) -> Result<Option<Principal>, ServiceError> {
        let Ok(id) = Uuid::parse_str(subject_id) else {
            return Ok(None);
        };

        let record = self.store.find_by_id(kind, id).await?;
        Ok(record.map(|r| r.sanitized()))
    }

    fn respond(&self, principal: Principal) -> Result<AuthResponse, ServiceError> {
        let token = self.jwt.sign(&TokenClaims::for_principal(&principal))?;
        Ok(AuthResponse { token, principal })
    }
}
