use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Storage model for one recorded vitals snapshot
///
/// Only raw values are stored. Severity statuses are derived again by the
/// domain layer when a record is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsRecord {
    /// Unique identifier for the record
    pub id: String,

    /// When the snapshot was taken
    pub recorded_at: DateTime<Utc>,

    /// Heart rate in beats per minute
    pub heart_rate: f64,

    /// Body temperature in degrees Celsius
    pub temperature: f64,

    /// Blood oxygen saturation in percent
    pub oxygen_level: f64,
}

impl VitalsRecord {
    /// Create a record with a freshly generated identifier
    pub fn new(recorded_at: DateTime<Utc>, heart_rate: f64, temperature: f64, oxygen_level: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recorded_at,
            heart_rate,
            temperature,
            oxygen_level,
        }
    }

    /// Check that every stored value is a finite, non-negative number
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("heart_rate", self.heart_rate),
            ("temperature", self.temperature),
            ("oxygen_level", self.oxygen_level),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("invalid {} value: {}", name, value));
            }
        }

        Ok(())
    }
}
