use thiserror::Error;
use tracing::{error, info, warn};
use chrono::{DateTime, Duration, Utc};
use async_trait::async_trait;

use crate::entities::conversions;
use crate::entities::report::{HistoryComparison, VitalsReport};
use crate::entities::vitals::{HistoryEntry, VitalsSnapshot};
use crate::services::analysis;
use crate::services::generator::generate_historical_data;
use vitals_guide_data::repository::{RepositoryError, VitalsHistoryRepositoryTrait};

/// Vitals history service errors
#[derive(Debug, Error)]
pub enum VitalsServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Insufficient data error
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

/// Trait for vitals history operations
#[async_trait]
pub trait VitalsServiceTrait: Send + Sync {
    /// Store a snapshot in history
    async fn record_snapshot(&self, snapshot: &VitalsSnapshot) -> Result<HistoryEntry, VitalsServiceError>;

    /// Get a stored snapshot by ID
    async fn get_entry(&self, id: &str) -> Result<HistoryEntry, VitalsServiceError>;

    /// Get filtered history with the total count before pagination
    async fn get_history(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<HistoryEntry>, usize), VitalsServiceError>;

    /// Snapshots from the last `days` days, oldest first
    async fn get_recent_snapshots(&self, days: u32) -> Result<Vec<VitalsSnapshot>, VitalsServiceError>;

    /// Report over the last `days` days of history
    async fn get_report(&self, days: u32) -> Result<VitalsReport, VitalsServiceError>;

    /// Compare a snapshot against the last `days` days of history
    async fn compare_with_history(
        &self,
        current: &VitalsSnapshot,
        days: u32,
    ) -> Result<HistoryComparison, VitalsServiceError>;

    /// Number of stored snapshots
    async fn history_count(&self) -> Result<usize, VitalsServiceError>;
}

/// Vitals history service for domain logic
pub struct VitalsService<R: VitalsHistoryRepositoryTrait> {
    repository: R,
}

impl<R: VitalsHistoryRepositoryTrait> VitalsService<R> {
    /// Create a new vitals service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> VitalsServiceError {
        match err {
            RepositoryError::NotFound(msg) => VitalsServiceError::NotFound(msg),
            RepositoryError::Validation(msg) | RepositoryError::Pagination(msg) => {
                VitalsServiceError::ValidationError(msg)
            }
            _ => {
                error!("Vitals repository failure: {}", err);
                VitalsServiceError::RepositoryError(err.to_string())
            }
        }
    }

    /// Snapshots recorded within the last `days` days, oldest first
    ///
    /// Records that no longer validate are skipped with a warning.
    async fn recent_snapshots(&self, days: u32) -> Result<Vec<VitalsSnapshot>, VitalsServiceError> {
        let since = Utc::now() - Duration::days(i64::from(days));
        let (records, _) = self.repository
            .get_filtered(Some(since), None, None, None, Some(false))
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(records
            .iter()
            .filter_map(|record| match conversions::convert_to_domain_snapshot(record) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!("Skipping stored record {}: {}", record.id, e);
                    None
                }
            })
            .collect())
    }

    /// Fill history with synthetic snapshots for the last `days` days
    pub async fn seed_history(&self, days: u32) -> Result<usize, VitalsServiceError> {
        let snapshots = {
            let mut rng = rand::thread_rng();
            generate_historical_data(days, Utc::now(), &mut rng)
        };

        let mut stored = 0;
        for snapshot in &snapshots {
            self.repository
                .insert(conversions::convert_to_data_record(snapshot))
                .await
                .map_err(|e| self.map_repo_error(e))?;
            stored += 1;
        }

        info!("Seeded {} historical snapshots over {} days", stored, days);
        Ok(stored)
    }
}

#[async_trait]
impl<R: VitalsHistoryRepositoryTrait> VitalsServiceTrait for VitalsService<R> {
    async fn record_snapshot(&self, snapshot: &VitalsSnapshot) -> Result<HistoryEntry, VitalsServiceError> {
        let record = self.repository
            .insert(conversions::convert_to_data_record(snapshot))
            .await
            .map_err(|e| self.map_repo_error(e))?;

        conversions::convert_to_domain_entry(&record)
            .map_err(|e| VitalsServiceError::ValidationError(e.to_string()))
    }

    async fn get_entry(&self, id: &str) -> Result<HistoryEntry, VitalsServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id)
            .map_err(VitalsServiceError::ValidationError)?;

        let record = self.repository.get_by_id(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| VitalsServiceError::NotFound(
                format!("Vitals snapshot with ID {} not found", id)
            ))?;

        conversions::convert_to_domain_entry(&record)
            .map_err(|e| VitalsServiceError::RepositoryError(e.to_string()))
    }

    async fn get_history(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<HistoryEntry>, usize), VitalsServiceError> {
        let (records, total) = self.repository
            .get_filtered(start_date, end_date, limit, offset, sort_desc)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        let entries = records
            .iter()
            .map(conversions::convert_to_domain_entry)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VitalsServiceError::RepositoryError(e.to_string()))?;

        Ok((entries, total))
    }

    async fn get_recent_snapshots(&self, days: u32) -> Result<Vec<VitalsSnapshot>, VitalsServiceError> {
        self.recent_snapshots(days).await
    }

    async fn get_report(&self, days: u32) -> Result<VitalsReport, VitalsServiceError> {
        let snapshots = self.recent_snapshots(days).await?;
        analysis::generate_vital_analysis(&snapshots).ok_or_else(|| {
            VitalsServiceError::InsufficientData(format!(
                "No snapshots recorded in the last {} days",
                days
            ))
        })
    }

    async fn compare_with_history(
        &self,
        current: &VitalsSnapshot,
        days: u32,
    ) -> Result<HistoryComparison, VitalsServiceError> {
        let snapshots = self.recent_snapshots(days).await?;
        Ok(analysis::compare_with_history(current, &snapshots))
    }

    async fn history_count(&self) -> Result<usize, VitalsServiceError> {
        self.repository.count().await.map_err(|e| self.map_repo_error(e))
    }
}

/// Create a default vitals service using the repository from data layer
pub fn create_default_vitals_service() -> VitalsService<vitals_guide_data::repository::VitalsHistoryRepository> {
    let repository = vitals_guide_data::repository::VitalsHistoryRepository::new();
    VitalsService::new(repository)
}
