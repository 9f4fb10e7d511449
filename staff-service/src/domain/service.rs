use std::sync::Arc;

use shared::types::{User, UserType, UserWithSchoolYear};
use uuid::Uuid;
use validator::Validate;

use crate::domain::password::PasswordHasher;
use crate::domain::school_year::SchoolYearRepository;
use crate::domain::staff::{CreateStaff, UniqueFields, UpdateStaff};
use crate::domain::user::{
    NewUser, UserPatch, UserRepository, WriteOutcome, email_taken, rfid_taken,
};
use crate::error::StaffServiceError;

/// Staff accounts over the shared `users` table.
///
/// Every id-keyed read and write is scoped to [`UserType::Staff`], while rfid
/// and email must stay unique across all user types. The pre-write uniqueness
/// check gives readable errors; the table's unique constraints catch the
/// races it cannot.
pub struct StaffService {
    user_repo: Arc<dyn UserRepository>,
    school_year_repo: Arc<dyn SchoolYearRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl StaffService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        school_year_repo: Arc<dyn SchoolYearRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repo,
            school_year_repo,
            hasher,
        }
    }

    /// Fails with [`StaffServiceError::Validation`] listing every identifying
    /// field already held by another user.
    ///
    /// With `exclude_id`, the staff record being edited is loaded first and a
    /// field repeating that record's current value is not a conflict. A missing
    /// record is [`StaffServiceError::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn validate_unique(
        &self,
        candidate: UniqueFields<'_>,
        exclude_id: Option<Uuid>,
    ) -> Result<(), StaffServiceError> {
        let current = match exclude_id {
            Some(id) => Some(
                self.user_repo
                    .find_by_id(id, UserType::Staff)
                    .await?
                    .ok_or_else(|| StaffServiceError::NotFound(format!("Staff {id} not found")))?,
            ),
            None => None,
        };

        self.check_unique(candidate, current.as_ref()).await
    }

    async fn check_unique(
        &self,
        candidate: UniqueFields<'_>,
        current: Option<&User>,
    ) -> Result<(), StaffServiceError> {
        let mut errors = Vec::new();

        if let Some(rfid) = candidate.rfid {
            let holder = self.user_repo.find_by_rfid(rfid).await?;
            if holder.is_some_and(|holder| current.is_none_or(|c| holder.rfid != c.rfid)) {
                errors.push(rfid_taken(rfid));
            }
        }

        if let Some(email) = candidate.email {
            let holder = self.user_repo.find_by_email(email).await?;
            if holder.is_some_and(|holder| current.is_none_or(|c| holder.email != c.email)) {
                errors.push(email_taken(email));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(StaffServiceError::Validation(errors))
        }
    }

    /// Creates a staff account attached to `school_year_id`.
    ///
    /// The school year is resolved before anything else, so an unknown id
    /// fails with `NotFound` and nothing is written.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        request: CreateStaff,
        school_year_id: Uuid,
    ) -> Result<User, StaffServiceError> {
        let school_year = self
            .school_year_repo
            .find_by_id(school_year_id)
            .await?
            .ok_or_else(|| {
                StaffServiceError::NotFound(format!("School year {school_year_id} not found"))
            })?;

        request.validate()?;

        self.check_unique(request.unique_fields(), None).await?;

        let password = self.hash_password(request.password).await?;

        let output = self
            .user_repo
            .create(NewUser {
                rfid: request.rfid,
                email: request.email,
                password,
                name: request.name,
                user_type: UserType::Staff,
                school_year_id: Some(school_year.id),
            })
            .await?;

        tracing::info!(staff_id = %output.id, school_year = %school_year.name, "Staff created");

        Ok(output)
    }

    /// Staff attached to the given school year, each with that school year
    /// embedded. Staff without a school year, or attached to another one, are
    /// left out.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(
        &self,
        school_year_id: Uuid,
    ) -> Result<Vec<UserWithSchoolYear>, StaffServiceError> {
        self.user_repo
            .find_by_school_year(UserType::Staff, school_year_id)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<Option<User>, StaffServiceError> {
        self.user_repo.find_by_id(id, UserType::Staff).await
    }

    /// Applies the present fields of `request` to staff `id`, hashing a new
    /// password first. An unknown id is reported as zero affected rows.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateStaff,
    ) -> Result<WriteOutcome, StaffServiceError> {
        request.validate()?;

        let Some(current) = self.user_repo.find_by_id(id, UserType::Staff).await? else {
            tracing::info!(staff_id = %id, "No staff to update");
            return Ok(WriteOutcome { affected: 0 });
        };

        self.check_unique(request.unique_fields(), Some(&current))
            .await?;

        let password = match request.password {
            Some(plaintext) => Some(self.hash_password(plaintext).await?),
            None => None,
        };

        let affected = self
            .user_repo
            .update(
                id,
                UserType::Staff,
                UserPatch {
                    rfid: request.rfid,
                    email: request.email,
                    password,
                    name: request.name,
                },
            )
            .await?;

        Ok(WriteOutcome { affected })
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<WriteOutcome, StaffServiceError> {
        let affected = self.user_repo.delete(id, UserType::Staff).await?;

        Ok(WriteOutcome { affected })
    }

    /// Argon2 is deliberately slow, so it runs off the async workers.
    async fn hash_password(&self, plaintext: String) -> Result<String, StaffServiceError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| StaffServiceError::Internal(format!("Password hashing task failed: {e}")))?
    }
}
