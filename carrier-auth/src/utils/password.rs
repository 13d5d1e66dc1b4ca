use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt;
use std::sync::OnceLock;

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Upper bound on accepted plaintext length, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,

    #[error("Password must be at most {MAX_PASSWORD_BYTES} bytes")]
    TooLong,

    #[error("Failed to hash password: {0}")]
    Hash(String),
}

impl PasswordError {
    /// Whether the caller supplied a bad value, as opposed to a hasher fault.
    pub fn is_input_error(&self) -> bool {
        matches!(self, PasswordError::Empty | PasswordError::TooLong)
    }
}

/// Plaintext password. `Debug` never prints the value.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// PHC-formatted Argon2id hash
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, PasswordError> {
    let raw = password.as_str();
    if raw.is_empty() {
        return Err(PasswordError::Empty);
    }
    if raw.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();

    Ok(PasswordHashString::new(hash))
}

/// Verify a password against a stored hash in constant time.
///
/// A malformed hash is a mismatch, never an error.
pub fn verify_password(password: &Password, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed)
        .is_ok()
}

/// Fixed Argon2id hash checked when no account matches a login email.
static DUMMY_HASH: OnceLock<Option<PasswordHashString>> = OnceLock::new();

#[cfg(test)]
pub(crate) static DUMMY_VERIFICATIONS: AtomicUsize = AtomicUsize::new(0);

fn dummy_hash() -> Option<&'static PasswordHashString> {
    DUMMY_HASH
        .get_or_init(|| match hash_password(&Password::new("carrier-auth-no-such-account")) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build dummy password hash");
                None
            }
        })
        .as_ref()
}

/// Run a full Argon2 verification for a login whose account does not exist,
/// so it costs the same as a wrong password. Always a mismatch.
pub fn verify_dummy(password: &Password) -> bool {
    #[cfg(test)]
    DUMMY_VERIFICATIONS.fetch_add(1, Ordering::Relaxed);

    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash.as_str());
    }
    false
}
