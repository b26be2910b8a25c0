use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use validator::Validate;
use utoipa::ToSchema;

use vitals_guide_domain::entities::{
    DetailedAnalysis, PredictionResult, Reading, VitalAlert, VitalStatus, VitalType, VitalsError,
    VitalsReport, VitalsSnapshot,
};

/// Request payload for classifying a single value
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClassifyRequest {
    /// Which vital the value belongs to
    pub vital_type: VitalType,

    /// Raw value in the vital's unit
    #[validate(range(min = 0.0, message = "Value must not be negative"))]
    pub value: f64,
}

/// Classification of a single value
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassifyResponse {
    pub vital_type: VitalType,
    pub value: f64,
    pub unit: String,
    pub status: VitalStatus,
}

/// Request payload for a device reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReadingRequest {
    /// Which vital was measured
    pub vital_type: VitalType,

    /// Measured value
    #[validate(range(min = 0.0, message = "Value must not be negative"))]
    pub value: f64,

    /// When the reading was taken. Defaults to current time if not provided.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ReadingRequest {
    pub fn into_reading(self) -> Result<Reading, VitalsError> {
        Reading::new(self.vital_type, self.value, self.timestamp.unwrap_or_else(Utc::now))
    }
}

/// Request payload carrying a full set of vitals
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SnapshotRequest {
    /// Heart rate in beats per minute
    #[validate(range(min = 0.0, max = 400.0, message = "Heart rate must be between 0 and 400"))]
    pub heart_rate: f64,

    /// Body temperature in degrees Celsius
    #[validate(range(min = 0.0, max = 50.0, message = "Temperature must be between 0 and 50"))]
    pub temperature: f64,

    /// Blood oxygen saturation in percent
    #[validate(range(min = 0.0, max = 100.0, message = "Oxygen level must be between 0 and 100"))]
    pub oxygen_level: f64,

    /// When the vitals were taken. Defaults to current time if not provided.
    pub timestamp: Option<DateTime<Utc>>,
}

impl SnapshotRequest {
    pub fn into_snapshot(self) -> Result<VitalsSnapshot, VitalsError> {
        VitalsSnapshot::from_values(
            self.heart_rate,
            self.temperature,
            self.oxygen_level,
            self.timestamp.unwrap_or_else(Utc::now),
        )
    }
}

/// Live snapshot with its alert summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LiveVitalsResponse {
    pub snapshot: VitalsSnapshot,
    pub alert: VitalAlert,
}

impl From<&VitalsSnapshot> for LiveVitalsResponse {
    fn from(snapshot: &VitalsSnapshot) -> Self {
        Self {
            snapshot: snapshot.clone(),
            alert: VitalAlert::evaluate(snapshot),
        }
    }
}

/// Report over stored history
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportResponse {
    /// Analysis window in days
    pub period_days: u32,

    pub report: VitalsReport,

    /// Plain text rendering of the report
    pub summary: String,
}

/// Prediction with detail for the predicted condition
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PredictionResponse {
    pub prediction: PredictionResult,
    pub analysis: DetailedAnalysis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_value_fails_validation() {
        let request = ClassifyRequest { vital_type: VitalType::HeartRate, value: -1.0 };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_snapshot_request_bounds() {
        let request = SnapshotRequest {
            heart_rate: 72.0,
            temperature: 36.8,
            oxygen_level: 101.0,
            timestamp: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("oxygen_level"));
    }

    #[test]
    fn test_reading_request_defaults_timestamp() {
        let before = Utc::now();
        let reading = ReadingRequest {
            vital_type: VitalType::Temperature,
            value: 37.1,
            timestamp: None,
        }
        .into_reading()
        .unwrap();
        assert!(reading.timestamp >= before);
        assert_eq!(reading.value, 37.1);
    }
}
