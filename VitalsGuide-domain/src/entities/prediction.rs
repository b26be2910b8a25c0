use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Condition suggested by the rule-based predictor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Fever, fast pulse and low oxygen
    Pneumonia,

    /// Fever and fast pulse with normal oxygen
    FluOrViralInfection,

    /// Low temperature with slow pulse
    Hypothermia,

    /// Severely low oxygen saturation
    Hypoxia,

    /// Fast pulse without fever
    Tachycardia,

    /// Nothing matched
    NoClearCondition,
}

impl Condition {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Pneumonia => "Pneumonia",
            Condition::FluOrViralInfection => "Flu or viral infection",
            Condition::Hypothermia => "Hypothermia",
            Condition::Hypoxia => "Hypoxia",
            Condition::Tachycardia => "Tachycardia",
            Condition::NoClearCondition => "No clear indicators of a specific condition",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PredictionResult {
    /// Matched condition
    pub condition: Condition,

    /// Fixed confidence attached to the matching rule, in [0, 1]
    pub confidence: f64,

    /// Typical symptoms, in display order
    pub symptoms: Vec<String>,

    /// Advice text
    pub advice: String,
}

/// Extra clinical detail for professionals
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DetailedAnalysis {
    pub possible_causes: Vec<String>,
    pub recommended_tests: Vec<String>,
    pub possible_treatments: Vec<String>,

    /// Set when no detail is available for the condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
