use async_trait::async_trait;
use shared::types::{SchoolYear, User, UserType, UserWithSchoolYear};
use sqlx::{FromRow, PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    domain::user::{NewUser, UserPatch, UserRepository, email_taken, rfid_taken},
    error::StaffServiceError,
};

const RFID_CONSTRAINT: &str = "users_rfid_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";
const SCHOOL_YEAR_CONSTRAINT: &str = "users_school_year_id_fkey";

const USER_COLUMNS: &str =
    "id, rfid, email, password, name, type, school_year_id, created_at, updated_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translates constraint failures on a write into the errors the service
/// reports for the same conditions. Two writers can both pass the pre-write
/// uniqueness check; only one gets past the unique constraint. A school year
/// deleted after it was looked up fails the foreign key instead.
fn map_write_error(
    err: sqlx::Error,
    rfid: Option<&str>,
    email: Option<&str>,
    school_year_id: Option<Uuid>,
) -> StaffServiceError {
    let (constraint, unique) = match &err {
        sqlx::Error::Database(db_err)
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
        {
            (
                db_err.constraint().map(str::to_owned),
                db_err.is_unique_violation(),
            )
        }
        _ => return StaffServiceError::Database(err),
    };

    match (constraint.as_deref(), unique) {
        (Some(RFID_CONSTRAINT), true) if rfid.is_some() => {
            StaffServiceError::Validation(vec![rfid_taken(rfid.unwrap_or_default())])
        }
        (Some(EMAIL_CONSTRAINT), true) if email.is_some() => {
            StaffServiceError::Validation(vec![email_taken(email.unwrap_or_default())])
        }
        (Some(SCHOOL_YEAR_CONSTRAINT), false) => match school_year_id {
            Some(id) => StaffServiceError::NotFound(format!("School year {id} not found")),
            None => StaffServiceError::Database(err),
        },
        _ => StaffServiceError::Database(err),
    }
}

/// Reads a row of `users` joined with `school_years`, where the school year
/// columns carry an `sy_` prefix.
fn user_with_school_year(row: &PgRow) -> Result<UserWithSchoolYear, sqlx::Error> {
    Ok(UserWithSchoolYear {
        user: User::from_row(row)?,
        school_year: SchoolYear {
            id: row.try_get("sy_id")?,
            name: row.try_get("sy_name")?,
            start_date: row.try_get("sy_start_date")?,
            end_date: row.try_get("sy_end_date")?,
            created_at: row.try_get("sy_created_at")?,
            updated_at: row.try_get("sy_updated_at")?,
        },
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_id(
        &self,
        id: Uuid,
        user_type: UserType,
    ) -> Result<Option<User>, StaffServiceError> {
        let output = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND type = $2"
        ))
        .bind(id)
        .bind(user_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_rfid(&self, rfid: &str) -> Result<Option<User>, StaffServiceError> {
        let output = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE rfid = $1"
        ))
        .bind(rfid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StaffServiceError> {
        let output = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(output)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_school_year(
        &self,
        user_type: UserType,
        school_year_id: Uuid,
    ) -> Result<Vec<UserWithSchoolYear>, StaffServiceError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.rfid, u.email, u.password, u.name, u.type,
                   u.school_year_id, u.created_at, u.updated_at,
                   sy.id AS sy_id, sy.name AS sy_name,
                   sy.start_date AS sy_start_date, sy.end_date AS sy_end_date,
                   sy.created_at AS sy_created_at, sy.updated_at AS sy_updated_at
            FROM users u
            INNER JOIN school_years sy
                ON sy.id = u.school_year_id AND sy.id = $2
            WHERE u.type = $1
            ORDER BY u.name, u.id
            "#,
        )
        .bind(user_type)
        .bind(school_year_id)
        .fetch_all(&self.pool)
        .await?;

        let output = rows
            .iter()
            .map(user_with_school_year)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(output)
    }

    #[tracing::instrument(skip(self, user), fields(rfid = %user.rfid, email = %user.email))]
    async fn create(&self, user: NewUser) -> Result<User, StaffServiceError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (rfid, email, password, name, type, school_year_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.rfid)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(user.user_type)
        .bind(user.school_year_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                Some(&user.rfid),
                Some(&user.email),
                user.school_year_id,
            )
        })
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update(
        &self,
        id: Uuid,
        user_type: UserType,
        patch: UserPatch,
    ) -> Result<u64, StaffServiceError> {
        let output = sqlx::query(
            r#"
            UPDATE users
            SET rfid = COALESCE($3, rfid),
                email = COALESCE($4, email),
                password = COALESCE($5, password),
                name = COALESCE($6, name),
                updated_at = now()
            WHERE id = $1 AND type = $2
            "#,
        )
        .bind(id)
        .bind(user_type)
        .bind(patch.rfid.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.password.as_deref())
        .bind(patch.name.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, patch.rfid.as_deref(), patch.email.as_deref(), None)
        })?;

        Ok(output.rows_affected())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: Uuid, user_type: UserType) -> Result<u64, StaffServiceError> {
        let output = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1 AND type = $2
            "#,
        )
        .bind(id)
        .bind(user_type)
        .execute(&self.pool)
        .await?;

        Ok(output.rows_affected())
    }
}
