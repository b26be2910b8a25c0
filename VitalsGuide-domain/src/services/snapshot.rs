use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::entities::vitals::{Reading, VitalsError, VitalsSnapshot};

/// Shared live snapshot updated one reading at a time
///
/// Updates are copy-on-write: readers get an `Arc` to an immutable snapshot
/// and a merge swaps in a new one. The merge runs under the write lock so two
/// concurrent readings of different vitals never lose each other's field.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<VitalsSnapshot>>>,
}

impl SnapshotStore {
    pub fn new(initial: VitalsSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    /// Current snapshot
    pub fn current(&self) -> Arc<VitalsSnapshot> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Merge one reading, keeping the other two vitals untouched
    pub fn apply(&self, reading: &Reading) -> Result<Arc<VitalsSnapshot>, VitalsError> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let next = match guard.with_reading(reading) {
            Ok(next) => Arc::new(next),
            Err(e) => {
                warn!("Discarding reading: {}", e);
                return Err(e);
            }
        };

        debug!(vital = %reading.vital_type, value = reading.value, "Live snapshot updated");
        *guard = next.clone();
        Ok(next)
    }

    /// Replace the whole snapshot
    pub fn replace(&self, snapshot: VitalsSnapshot) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::new(snapshot);
    }
}
