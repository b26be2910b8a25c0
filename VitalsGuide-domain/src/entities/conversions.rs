use uuid::Uuid;
use vitals_guide_data::models::VitalsRecord;

use crate::entities::vitals::{HistoryEntry, VitalsError, VitalsSnapshot};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Parse a string ID to UUID with a descriptive error
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Convert a snapshot to a storage record with a fresh id
///
/// Individual vital timestamps collapse onto the snapshot timestamp.
pub fn convert_to_data_record(snapshot: &VitalsSnapshot) -> VitalsRecord {
    VitalsRecord::new(
        snapshot.timestamp(),
        snapshot.heart_rate().value(),
        snapshot.temperature().value(),
        snapshot.oxygen_level().value(),
    )
}

/// Convert a storage record back to a snapshot, re-deriving every status
pub fn convert_to_domain_snapshot(record: &VitalsRecord) -> Result<VitalsSnapshot, VitalsError> {
    VitalsSnapshot::from_values(
        record.heart_rate,
        record.temperature,
        record.oxygen_level,
        record.recorded_at,
    )
}

/// Convert a storage record to a history entry keeping its id
pub fn convert_to_domain_entry(record: &VitalsRecord) -> Result<HistoryEntry, VitalsError> {
    Ok(HistoryEntry {
        id: record.id.clone(),
        snapshot: convert_to_domain_snapshot(record)?,
    })
}
