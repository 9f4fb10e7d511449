use async_trait::async_trait;
use shared::types::SchoolYear;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{domain::school_year::SchoolYearRepository, error::StaffServiceError};

pub struct PgSchoolYearRepository {
    pool: PgPool,
}

impl PgSchoolYearRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchoolYearRepository for PgSchoolYearRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SchoolYear>, StaffServiceError> {
        let output = sqlx::query_as::<_, SchoolYear>(
            r#"
            SELECT id, name, start_date, end_date, created_at, updated_at
            FROM school_years
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(output)
    }
}
