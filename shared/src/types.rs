use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// region: User Types

/// Role of an account in the shared `users` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Admin,
    Staff,
    Student,
}

/// Account record. Staff, students and admins all live in the same table,
/// so `rfid` and `email` are unique across every type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub rfid: String,
    pub email: String,
    // hash only, never leaves the service
    #[serde(skip_serializing, default)]
    pub password: String,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub school_year_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// endregion: User Types

// region: School Year Types

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow, ToSchema)]
pub struct SchoolYear {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with the school year it is attached to, as returned by
/// listings that join `school_years`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserWithSchoolYear {
    #[serde(flatten)]
    pub user: User,
    pub school_year: SchoolYear,
}

// endregion: School Year Types
