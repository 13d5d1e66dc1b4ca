use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::models::Principal;

/// Identity carried by every token.
///
/// `principal_type` stays a raw string so that an unknown value survives
/// verification and is rejected by principal resolution instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Principal id
    pub sub: String,
    pub email: String,
    #[serde(rename = "type")]
    pub principal_type: String,
    /// Moderator role; absent for users and companies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl TokenClaims {
    pub fn for_principal(principal: &Principal) -> Self {
        let (email, role) = match principal {
            Principal::User(u) => (u.email.clone(), None),
            Principal::Company(c) => (c.email.clone(), None),
            Principal::Moderator(m) => (m.email.clone(), Some(m.role.as_str().to_string())),
        };

        Self {
            sub: principal.id().to_string(),
            email,
            principal_type: principal.kind().as_str().to_string(),
            role,
        }
    }
}

/// On-the-wire payload: identity plus registered time claims.
#[derive(Debug, Serialize, Deserialize)]
struct SignedClaims {
    #[serde(flatten)]
    claims: TokenClaims,
    iat: i64,
    exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// HS256 token issuer and verifier over one process-wide secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_expiry: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            default_expiry: Duration::try_minutes(config.expiry_minutes).unwrap_or(Duration::MAX),
        }
    }

    /// Sign `claims` with an explicit lifetime.
    pub fn issue(&self, claims: &TokenClaims, expiry: Duration) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(expiry)
            .ok_or_else(|| anyhow::anyhow!("Token expiry out of range"))?;
        let payload = SignedClaims {
            claims: claims.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    /// Sign `claims` with the configured default lifetime.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, anyhow::Error> {
        self.issue(claims, self.default_expiry)
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<SignedClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}
