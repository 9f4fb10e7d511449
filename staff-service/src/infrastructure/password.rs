use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng},
};

use crate::{config::PasswordConfig, domain::password::PasswordHasher, error::StaffServiceError};

/// Argon2id with the work factor taken from [`PasswordConfig`].
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new(config: &PasswordConfig) -> Result<Self, StaffServiceError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| StaffServiceError::Internal(format!("Invalid argon2 params: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, StaffServiceError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| StaffServiceError::Internal(format!("Password hashing failed: {e}")))
    }
}
