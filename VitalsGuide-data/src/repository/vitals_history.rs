use tracing::{debug, warn};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use async_trait::async_trait;

use crate::models::VitalsRecord;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;

/// Repository trait for recorded vitals snapshots
#[async_trait]
pub trait VitalsHistoryRepositoryTrait: Send + Sync {
    /// Store a new record
    async fn insert(&self, record: VitalsRecord) -> Result<VitalsRecord, RepositoryError>;

    /// Get all records, oldest first
    async fn get_all(&self) -> Result<Vec<VitalsRecord>, RepositoryError>;

    /// Get the most recent record
    async fn get_latest(&self) -> Result<Option<VitalsRecord>, RepositoryError>;

    /// Get a record by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<VitalsRecord>, RepositoryError>;

    /// Get filtered records together with the total count before pagination
    async fn get_filtered(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalsRecord>, usize), RepositoryError>;

    /// Number of stored records
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// Repository for vitals history backed by in-memory storage.
#[derive(Debug, Clone, Default)]
pub struct VitalsHistoryRepository {
    storage: InMemoryStorage,
}

impl VitalsHistoryRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

#[async_trait]
impl VitalsHistoryRepositoryTrait for VitalsHistoryRepository {
    async fn insert(&self, record: VitalsRecord) -> Result<VitalsRecord, RepositoryError> {
        if let Err(msg) = record.validate() {
            warn!("Rejecting vitals record {}: {}", record.id, msg);
            return Err(RepositoryError::Validation(msg));
        }

        debug!("Storing vitals record {}", record.id);
        self.storage.store_record(&record).await
    }

    async fn get_all(&self) -> Result<Vec<VitalsRecord>, RepositoryError> {
        self.storage.get_all().await
    }

    async fn get_latest(&self) -> Result<Option<VitalsRecord>, RepositoryError> {
        self.storage.get_latest().await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<VitalsRecord>, RepositoryError> {
        self.storage.get_by_id(&id).await
    }

    async fn get_filtered(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalsRecord>, usize), RepositoryError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(RepositoryError::Pagination(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }

        self.storage.get_filtered(start_date, end_date, limit, offset, sort_desc).await
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        self.storage.count().await
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;

    /// Mock repository holding a fixed set of records
    #[derive(Debug, Clone, Default)]
    pub struct MockVitalsHistoryRepository {
        pub records: Vec<VitalsRecord>,
        pub fail: bool,
    }

    impl MockVitalsHistoryRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_records(records: Vec<VitalsRecord>) -> Self {
            Self { records, fail: false }
        }

        /// Every call returns a lock error
        pub fn failing() -> Self {
            Self { records: Vec::new(), fail: true }
        }

        fn check(&self) -> Result<(), RepositoryError> {
            if self.fail {
                Err(RepositoryError::Lock("mock is configured to fail".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl VitalsHistoryRepositoryTrait for MockVitalsHistoryRepository {
        async fn insert(&self, record: VitalsRecord) -> Result<VitalsRecord, RepositoryError> {
            self.check()?;
            record.validate().map_err(RepositoryError::Validation)?;
            Ok(record)
        }

        async fn get_all(&self) -> Result<Vec<VitalsRecord>, RepositoryError> {
            self.check()?;
            Ok(self.records.clone())
        }

        async fn get_latest(&self) -> Result<Option<VitalsRecord>, RepositoryError> {
            self.check()?;
            Ok(self.records.iter().max_by(|a, b| a.recorded_at.cmp(&b.recorded_at)).cloned())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<VitalsRecord>, RepositoryError> {
            self.check()?;
            Ok(self.records.iter().find(|r| r.id == id.to_string()).cloned())
        }

        async fn get_filtered(
            &self,
            start_date: Option<DateTime<Utc>>,
            end_date: Option<DateTime<Utc>>,
            limit: Option<usize>,
            offset: Option<usize>,
            sort_desc: Option<bool>,
        ) -> Result<(Vec<VitalsRecord>, usize), RepositoryError> {
            self.check()?;
            let mut filtered: Vec<VitalsRecord> = self.records.iter()
                .filter(|r| start_date.map_or(true, |s| r.recorded_at >= s))
                .filter(|r| end_date.map_or(true, |e| r.recorded_at <= e))
                .cloned()
                .collect();

            filtered.sort_by(|a, b| {
                let cmp = a.recorded_at.cmp(&b.recorded_at);
                if sort_desc.unwrap_or(true) { cmp.reverse() } else { cmp }
            });

            let total = filtered.len();
            let paged = filtered
                .into_iter()
                .skip(offset.unwrap_or(0))
                .take(limit.unwrap_or(usize::MAX))
                .collect();

            Ok((paged, total))
        }

        async fn count(&self) -> Result<usize, RepositoryError> {
            self.check()?;
            Ok(self.records.len())
        }
    }
}
