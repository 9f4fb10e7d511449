use async_trait::async_trait;
use shared::types::SchoolYear;
use uuid::Uuid;

use crate::error::StaffServiceError;

#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait SchoolYearRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SchoolYear>, StaffServiceError>;
}
