use std::sync::Arc;

use async_trait::async_trait;
use shared::types::SchoolYear;
use uuid::Uuid;

use super::client::RedisCache;
use crate::domain::school_year::SchoolYearRepository;
use crate::error::StaffServiceError;

fn key_by_id(id: Uuid) -> String {
    format!("school-year:id:{id}")
}

/// Cache-aside decorator around a [`SchoolYearRepository`].
///
/// Only hits are stored, so a school year created after a failed lookup is
/// visible immediately.
pub struct CachedSchoolYearRepository {
    inner: Arc<dyn SchoolYearRepository>,
    cache: RedisCache,
    ttl_seconds: u64,
}

impl CachedSchoolYearRepository {
    pub fn new(inner: Arc<dyn SchoolYearRepository>, cache: RedisCache, ttl_seconds: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_seconds,
        }
    }
}

#[async_trait]
impl SchoolYearRepository for CachedSchoolYearRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SchoolYear>, StaffServiceError> {
        let key = key_by_id(id);
        if let Some(cached) = self.cache.get::<SchoolYear>(&key).await {
            return Ok(Some(cached));
        }

        let output = self.inner.find_by_id(id).await?;
        if let Some(school_year) = &output {
            self.cache.set(&key, school_year, self.ttl_seconds).await;
        }

        Ok(output)
    }
}
