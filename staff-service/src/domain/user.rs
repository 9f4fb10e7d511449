use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::types::{User, UserType, UserWithSchoolYear};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::StaffServiceError;

/// Row to insert. `password` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub rfid: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub user_type: UserType,
    pub school_year_id: Option<Uuid>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub rfid: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Rows touched by an update or delete. Zero means nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WriteOutcome {
    pub affected: u64,
}

pub fn rfid_taken(rfid: &str) -> String {
    format!("User with rfid {rfid} already exist.")
}

pub fn email_taken(email: &str) -> String {
    format!("User with email {email} already exist.")
}

/// Access to the shared `users` table. Lookups by rfid and email span every
/// user type; everything keyed by id is scoped to one type.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: Uuid,
        user_type: UserType,
    ) -> Result<Option<User>, StaffServiceError>;
    async fn find_by_rfid(&self, rfid: &str) -> Result<Option<User>, StaffServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StaffServiceError>;
    async fn find_by_school_year(
        &self,
        user_type: UserType,
        school_year_id: Uuid,
    ) -> Result<Vec<UserWithSchoolYear>, StaffServiceError>;
    async fn create(&self, user: NewUser) -> Result<User, StaffServiceError>;
    async fn update(
        &self,
        id: Uuid,
        user_type: UserType,
        patch: UserPatch,
    ) -> Result<u64, StaffServiceError>;
    async fn delete(&self, id: Uuid, user_type: UserType) -> Result<u64, StaffServiceError>;
}
