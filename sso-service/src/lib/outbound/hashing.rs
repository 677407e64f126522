use auth::PasswordError;
use auth::PasswordHasher;

use crate::config::HashingConfig;
use crate::domain::auth::errors::HashError;
use crate::domain::auth::ports::CredentialHasher;

/// Argon2id credential hasher backed by the auth library.
///
/// Hashes are stored as the bytes of their PHC string.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    inner: PasswordHasher,
}

impl Argon2Hasher {
    pub fn new(inner: PasswordHasher) -> Self {
        Self { inner }
    }

    /// Build a hasher with the configured cost.
    pub fn from_config(config: &HashingConfig) -> Result<Self, PasswordError> {
        PasswordHasher::with_params(config.memory_kib, config.iterations, config.parallelism)
            .map(Self::new)
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<Vec<u8>, HashError> {
        self.inner
            .hash(password)
            .map(String::into_bytes)
            .map_err(|e| HashError::HashingFailed(e.to_string()))
    }

    fn verify(&self, password: &str, password_hash: &[u8]) -> Result<bool, HashError> {
        let password_hash = std::str::from_utf8(password_hash)
            .map_err(|e| HashError::VerificationFailed(format!("Hash is not UTF-8: {}", e)))?;

        self.inner
            .verify(password, password_hash)
            .map_err(|e| HashError::VerificationFailed(e.to_string()))
    }
}
