use crate::error::StaffServiceError;

/// One-way password hashing. Implementations salt every call, so hashing
/// the same plaintext twice gives different strings.
#[cfg_attr(feature = "test-support", mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, StaffServiceError>;
}
