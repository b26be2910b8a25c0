use crate::entities::vitals::{VitalStatus, VitalType};

pub const HEART_RATE_CRITICAL_LOW: f64 = 50.0;
pub const HEART_RATE_CRITICAL_HIGH: f64 = 120.0;
pub const HEART_RATE_WARNING_LOW: f64 = 60.0;
pub const HEART_RATE_WARNING_HIGH: f64 = 100.0;

pub const TEMPERATURE_CRITICAL_LOW: f64 = 35.0;
pub const TEMPERATURE_CRITICAL_HIGH: f64 = 39.0;
pub const TEMPERATURE_WARNING_LOW: f64 = 36.0;
pub const TEMPERATURE_WARNING_HIGH: f64 = 37.8;

pub const OXYGEN_LEVEL_CRITICAL_LOW: f64 = 90.0;
pub const OXYGEN_LEVEL_WARNING_LOW: f64 = 95.0;

/// Classify a raw value for the given vital
///
/// Total over f64. Boundary values fall into the milder band. Callers that
/// accept untrusted input validate first (see `validate_value`); a NaN that
/// slips through compares false everywhere and lands in `Normal`.
pub fn classify(vital_type: VitalType, value: f64) -> VitalStatus {
    match vital_type {
        VitalType::HeartRate => heart_rate_status(value),
        VitalType::Temperature => temperature_status(value),
        VitalType::OxygenLevel => oxygen_level_status(value),
    }
}

/// Heart rate in bpm
pub fn heart_rate_status(value: f64) -> VitalStatus {
    if value < HEART_RATE_CRITICAL_LOW || value > HEART_RATE_CRITICAL_HIGH {
        VitalStatus::Critical
    } else if value < HEART_RATE_WARNING_LOW || value > HEART_RATE_WARNING_HIGH {
        VitalStatus::Warning
    } else {
        VitalStatus::Normal
    }
}

/// Body temperature in °C
pub fn temperature_status(value: f64) -> VitalStatus {
    if value < TEMPERATURE_CRITICAL_LOW || value > TEMPERATURE_CRITICAL_HIGH {
        VitalStatus::Critical
    } else if value < TEMPERATURE_WARNING_LOW || value > TEMPERATURE_WARNING_HIGH {
        VitalStatus::Warning
    } else {
        VitalStatus::Normal
    }
}

/// Oxygen saturation in %
pub fn oxygen_level_status(value: f64) -> VitalStatus {
    if value < OXYGEN_LEVEL_CRITICAL_LOW {
        VitalStatus::Critical
    } else if value < OXYGEN_LEVEL_WARNING_LOW {
        VitalStatus::Warning
    } else {
        VitalStatus::Normal
    }
}
