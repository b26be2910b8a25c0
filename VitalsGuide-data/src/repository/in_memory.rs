use std::sync::{Arc, Mutex};
use std::collections::HashMap;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::VitalsRecord;
use super::errors::RepositoryError;

/// In-memory storage implementation for vitals records
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Storage for vitals records keyed by id
    records: Arc<Mutex<HashMap<String, VitalsRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a record in memory
    pub async fn store_record(&self, record: &VitalsRecord) -> Result<VitalsRecord, RepositoryError> {
        let mut store = self.records.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        store.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    /// Get all records from memory, oldest first
    pub async fn get_all(&self) -> Result<Vec<VitalsRecord>, RepositoryError> {
        let store = self.records.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        let mut records: Vec<VitalsRecord> = store.values().cloned().collect();
        records.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
        Ok(records)
    }

    /// Get the most recent record from memory
    pub async fn get_latest(&self) -> Result<Option<VitalsRecord>, RepositoryError> {
        let store = self.records.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(store.values().max_by(|a, b| a.recorded_at.cmp(&b.recorded_at)).cloned())
    }

    /// Get a record by ID from memory
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<VitalsRecord>, RepositoryError> {
        let store = self.records.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(store.get(&id.to_string()).cloned())
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<usize, RepositoryError> {
        let store = self.records.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(store.len())
    }

    /// Get filtered records from memory
    pub async fn get_filtered(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: Option<usize>,
        offset: Option<usize>,
        sort_desc: Option<bool>,
    ) -> Result<(Vec<VitalsRecord>, usize), RepositoryError> {
        let store = self.records.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        let sort_desc = sort_desc.unwrap_or(true);

        let mut records: Vec<VitalsRecord> = store.values().filter(|&record| {
                if let Some(start_date) = start_date {
                    if record.recorded_at < start_date {
                        return false;
                    }
                }

                if let Some(end_date) = end_date {
                    if record.recorded_at > end_date {
                        return false;
                    }
                }

                true
            }).cloned()
            .collect();

        records.sort_by(|a, b| {
            let cmp = a.recorded_at.cmp(&b.recorded_at);
            if sort_desc {
                cmp.reverse()
            } else {
                cmp
            }
        });

        let total = records.len();
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(total);

        let page = records
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();

        Ok((page, total))
    }
}
