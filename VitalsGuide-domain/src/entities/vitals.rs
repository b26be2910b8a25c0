use std::fmt;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::services::classifier::classify;

/// Errors raised when a raw value cannot become a vital
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VitalsError {
    /// Value is NaN, infinite or outside the physical range of the vital
    #[error("Invalid {vital_type} reading: {value}")]
    InvalidReading { vital_type: VitalType, value: f64 },
}

/// The three tracked vital signs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    /// Heart rate in beats per minute
    HeartRate,

    /// Body temperature in degrees Celsius
    Temperature,

    /// Blood oxygen saturation in percent
    OxygenLevel,
}

impl VitalType {
    pub const ALL: [VitalType; 3] = [VitalType::HeartRate, VitalType::Temperature, VitalType::OxygenLevel];

    /// Unit suffix used in human readable text
    pub fn unit(&self) -> &'static str {
        match self {
            VitalType::HeartRate => "bpm",
            VitalType::Temperature => "°C",
            VitalType::OxygenLevel => "%",
        }
    }

    /// Largest value a sensor can physically report
    pub fn max_value(&self) -> f64 {
        match self {
            VitalType::HeartRate => 400.0,
            VitalType::Temperature => 50.0,
            VitalType::OxygenLevel => 100.0,
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            VitalType::HeartRate => "Heart rate",
            VitalType::Temperature => "Body temperature",
            VitalType::OxygenLevel => "Oxygen level",
        }
    }
}

impl fmt::Display for VitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalType::HeartRate => write!(f, "heart_rate"),
            VitalType::Temperature => write!(f, "temperature"),
            VitalType::OxygenLevel => write!(f, "oxygen_level"),
        }
    }
}

/// Severity of a single vital reading, ordered from mildest to worst
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum VitalStatus {
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for VitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalStatus::Normal => write!(f, "normal"),
            VitalStatus::Warning => write!(f, "warning"),
            VitalStatus::Critical => write!(f, "critical"),
        }
    }
}

/// Reject values that no sensor can legitimately produce
///
/// Every constructor of `Vital` and `Reading` goes through here, so no entry
/// point can classify a value outside `0..=max_value`.
pub fn validate_value(vital_type: VitalType, value: f64) -> Result<f64, VitalsError> {
    if value.is_finite() && (0.0..=vital_type.max_value()).contains(&value) {
        Ok(value)
    } else {
        Err(VitalsError::InvalidReading { vital_type, value })
    }
}

/// One measurement with its derived status
///
/// There is no way to build a `Vital` with a status of your choosing: the
/// status is always computed from the value by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Vital {
    timestamp: DateTime<Utc>,
    value: f64,
    status: VitalStatus,
}

impl Vital {
    /// Validate and classify a raw value
    pub fn new(vital_type: VitalType, value: f64, timestamp: DateTime<Utc>) -> Result<Self, VitalsError> {
        let value = validate_value(vital_type, value)?;
        Ok(Self::classified(vital_type, value, timestamp))
    }

    /// Classify a value already known to be valid
    pub(crate) fn classified(vital_type: VitalType, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value,
            status: classify(vital_type, value),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn status(&self) -> VitalStatus {
        self.status
    }
}

/// One timestamped value from a real or simulated device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Reading {
    pub vital_type: VitalType,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Build a validated reading
    pub fn new(vital_type: VitalType, value: f64, timestamp: DateTime<Utc>) -> Result<Self, VitalsError> {
        let value = validate_value(vital_type, value)?;
        Ok(Self { vital_type, value, timestamp })
    }

    /// Build a validated reading stamped with the current time
    pub fn now(vital_type: VitalType, value: f64) -> Result<Self, VitalsError> {
        Self::new(vital_type, value, Utc::now())
    }
}

/// Heart rate, temperature and oxygen level taken at (roughly) one instant
///
/// Snapshots are values: merging a reading yields a new snapshot and leaves
/// the receiver untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalsSnapshot {
    timestamp: DateTime<Utc>,
    heart_rate: Vital,
    temperature: Vital,
    oxygen_level: Vital,
}

impl VitalsSnapshot {
    /// Combine three vitals; the snapshot timestamp is the newest of the three
    pub fn new(heart_rate: Vital, temperature: Vital, oxygen_level: Vital) -> Self {
        let timestamp = heart_rate.timestamp
            .max(temperature.timestamp)
            .max(oxygen_level.timestamp);

        Self {
            timestamp,
            heart_rate,
            temperature,
            oxygen_level,
        }
    }

    /// Validate and classify three raw values sharing one timestamp
    pub fn from_values(
        heart_rate: f64,
        temperature: f64,
        oxygen_level: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, VitalsError> {
        Ok(Self::new(
            Vital::new(VitalType::HeartRate, heart_rate, timestamp)?,
            Vital::new(VitalType::Temperature, temperature, timestamp)?,
            Vital::new(VitalType::OxygenLevel, oxygen_level, timestamp)?,
        ))
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn heart_rate(&self) -> &Vital {
        &self.heart_rate
    }

    pub fn temperature(&self) -> &Vital {
        &self.temperature
    }

    pub fn oxygen_level(&self) -> &Vital {
        &self.oxygen_level
    }

    /// Look a vital up by type
    pub fn vital(&self, vital_type: VitalType) -> &Vital {
        match vital_type {
            VitalType::HeartRate => &self.heart_rate,
            VitalType::Temperature => &self.temperature,
            VitalType::OxygenLevel => &self.oxygen_level,
        }
    }

    /// Worst status across the three vitals
    pub fn highest_status(&self) -> VitalStatus {
        VitalType::ALL
            .iter()
            .map(|t| self.vital(*t).status)
            .max()
            .unwrap_or(VitalStatus::Normal)
    }

    /// New snapshot with the reading's vital replaced and every other field kept
    pub fn with_reading(&self, reading: &Reading) -> Result<Self, VitalsError> {
        let vital = Vital::new(reading.vital_type, reading.value, reading.timestamp)?;
        let mut next = self.clone();
        match reading.vital_type {
            VitalType::HeartRate => next.heart_rate = vital,
            VitalType::Temperature => next.temperature = vital,
            VitalType::OxygenLevel => next.oxygen_level = vital,
        }
        next.timestamp = self.timestamp.max(reading.timestamp);
        Ok(next)
    }
}

/// A snapshot recorded in history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HistoryEntry {
    pub id: String,
    pub snapshot: VitalsSnapshot,
}
