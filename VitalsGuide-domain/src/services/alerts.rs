use crate::entities::report::VitalAlert;
use crate::entities::vitals::{VitalStatus, VitalType, VitalsSnapshot};
use crate::services::classifier::{HEART_RATE_WARNING_LOW, TEMPERATURE_WARNING_LOW};

fn critical_phrase(vital_type: VitalType, value: f64) -> String {
    match vital_type {
        VitalType::HeartRate => {
            let direction = if value < HEART_RATE_WARNING_LOW { "too low" } else { "too high" };
            format!("Heart rate ({} bpm) is {}. ", value, direction)
        }
        VitalType::Temperature => {
            let direction = if value < TEMPERATURE_WARNING_LOW { "too low" } else { "too high" };
            format!("Body temperature ({}°C) is {}. ", value, direction)
        }
        VitalType::OxygenLevel => format!("Oxygen level ({}%) is too low. ", value),
    }
}

fn warning_phrase(vital_type: VitalType, value: f64) -> String {
    match vital_type {
        VitalType::HeartRate => format!("Heart rate ({} bpm) is outside normal range. ", value),
        VitalType::Temperature => format!("Body temperature ({}°C) is outside normal range. ", value),
        VitalType::OxygenLevel => format!("Oxygen level ({}%) is slightly low. ", value),
    }
}

/// Summarise a snapshot into one alert at its worst severity
pub fn evaluate_alert(snapshot: &VitalsSnapshot) -> VitalAlert {
    let level = snapshot.highest_status();
    let vitals: Vec<VitalType> = VitalType::ALL
        .into_iter()
        .filter(|t| level != VitalStatus::Normal && snapshot.vital(*t).status() == level)
        .collect();

    let message = match level {
        VitalStatus::Normal => "All vital signs are normal.".to_string(),
        VitalStatus::Critical => {
            let mut message = String::from("Critical Alert: ");
            for vital_type in &vitals {
                message.push_str(&critical_phrase(*vital_type, snapshot.vital(*vital_type).value()));
            }
            message.push_str("Please seek medical attention.");
            message
        }
        VitalStatus::Warning => {
            let mut message = String::from("Warning: ");
            for vital_type in &vitals {
                message.push_str(&warning_phrase(*vital_type, snapshot.vital(*vital_type).value()));
            }
            message.push_str("Monitor your condition closely.");
            message
        }
    };

    VitalAlert { level, vitals, message }
}

impl VitalAlert {
    pub fn evaluate(snapshot: &VitalsSnapshot) -> Self {
        evaluate_alert(snapshot)
    }
}
