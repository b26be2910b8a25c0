use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::entities::prediction::{Condition, DetailedAnalysis, PredictionResult};
use crate::entities::vitals::VitalsSnapshot;

/// Default artificial delay applied before a prediction resolves
pub const DEFAULT_PREDICTION_DELAY: Duration = Duration::from_millis(1500);

/// One row of the prediction table
pub struct PredictionRule {
    pub condition: Condition,
    pub confidence: f64,
    pub matches: fn(&VitalsSnapshot) -> bool,
    pub symptoms: &'static [&'static str],
    pub advice: &'static str,
}

impl PredictionRule {
    fn to_result(&self) -> PredictionResult {
        PredictionResult {
            condition: self.condition,
            confidence: self.confidence,
            symptoms: self.symptoms.iter().map(|s| s.to_string()).collect(),
            advice: self.advice.to_string(),
        }
    }
}

fn fever_with_fast_pulse(s: &VitalsSnapshot) -> bool {
    s.temperature().value() > 38.0 && s.heart_rate().value() > 100.0
}

fn pneumonia(s: &VitalsSnapshot) -> bool {
    fever_with_fast_pulse(s) && s.oxygen_level().value() < 95.0
}

fn flu_or_viral_infection(s: &VitalsSnapshot) -> bool {
    fever_with_fast_pulse(s) && s.oxygen_level().value() >= 95.0
}

fn hypothermia(s: &VitalsSnapshot) -> bool {
    s.temperature().value() < 36.0 && s.heart_rate().value() < 60.0
}

fn hypoxia(s: &VitalsSnapshot) -> bool {
    s.oxygen_level().value() < 92.0
}

fn tachycardia(s: &VitalsSnapshot) -> bool {
    s.heart_rate().value() > 100.0 && s.temperature().value() < 37.5
}

fn always(_: &VitalsSnapshot) -> bool {
    true
}

/// Rules in priority order. Conditions overlap, so order is part of the contract.
pub static PREDICTION_RULES: [PredictionRule; 5] = [
    PredictionRule {
        condition: Condition::Pneumonia,
        confidence: 0.85,
        matches: pneumonia,
        symptoms: &[
            "Elevated body temperature",
            "Increased heart rate",
            "Low blood oxygen level",
            "Shortness of breath",
            "Cough",
        ],
        advice: "See a doctor urgently. A chest X-ray and a full medical evaluation may be needed.",
    },
    PredictionRule {
        condition: Condition::FluOrViralInfection,
        confidence: 0.78,
        matches: flu_or_viral_infection,
        symptoms: &[
            "Elevated body temperature",
            "Increased heart rate",
            "Headache",
            "Body aches",
            "General fatigue",
        ],
        advice: "Rest, drink plenty of fluids and take a fever reducer if needed. \
                 See a doctor if symptoms last more than 3 days.",
    },
    PredictionRule {
        condition: Condition::Hypothermia,
        confidence: 0.82,
        matches: hypothermia,
        symptoms: &[
            "Low body temperature",
            "Slow heart rate",
            "Fatigue",
            "Mental confusion",
            "Cold extremities",
        ],
        advice: "Warm the body gradually and get immediate medical help if the drop is severe (below 35°C).",
    },
    PredictionRule {
        condition: Condition::Hypoxia,
        confidence: 0.90,
        matches: hypoxia,
        symptoms: &[
            "Severe drop in blood oxygen level",
            "Shortness of breath",
            "Fatigue and exhaustion",
            "Dizziness",
            "Bluish lips or nails",
        ],
        advice: "This is a medical emergency. Go to the nearest emergency department \
                 or call an ambulance immediately.",
    },
    PredictionRule {
        condition: Condition::Tachycardia,
        confidence: 0.65,
        matches: tachycardia,
        symptoms: &[
            "Increased heart rate",
            "Palpitations",
            "Anxiety",
            "Shortness of breath",
            "Dizziness",
        ],
        advice: "Monitor your condition and note any additional symptoms. \
                 If the rapid heart rate persists or returns, consult a cardiologist.",
    },
];

/// Catch-all row used when no rule in `PREDICTION_RULES` matches
pub static FALLBACK_RULE: PredictionRule = PredictionRule {
    condition: Condition::NoClearCondition,
    confidence: 0.40,
    matches: always,
    symptoms: &[
        "Vital signs are within or close to the normal range",
        "There may be minor fluctuations in the readings",
    ],
    advice: "Vital signs are relatively stable. Keep up regular monitoring and healthy habits.",
};

/// Every rule in evaluation order, catch-all last
pub fn rules() -> impl Iterator<Item = &'static PredictionRule> {
    PREDICTION_RULES.iter().chain(std::iter::once(&FALLBACK_RULE))
}

/// Walk the rule table and return the first match
pub fn predict(snapshot: &VitalsSnapshot) -> PredictionResult {
    let rule = PREDICTION_RULES
        .iter()
        .find(|rule| (rule.matches)(snapshot))
        .unwrap_or(&FALLBACK_RULE);

    debug!(
        condition = %rule.condition,
        heart_rate = snapshot.heart_rate().value(),
        temperature = snapshot.temperature().value(),
        oxygen_level = snapshot.oxygen_level().value(),
        "Prediction rule matched"
    );

    rule.to_result()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Additional detail for a predicted condition
pub fn detailed_analysis(condition: Condition) -> DetailedAnalysis {
    match condition {
        Condition::Pneumonia => DetailedAnalysis {
            possible_causes: strings(&["Bacterial infection", "Viral infection", "Inhaled foreign material"]),
            recommended_tests: strings(&["Chest X-ray", "Complete blood count", "Sputum culture"]),
            possible_treatments: strings(&["Antibiotics", "Pain relievers", "Bronchodilators"]),
            note: None,
        },
        Condition::FluOrViralInfection => DetailedAnalysis {
            possible_causes: strings(&["Influenza virus", "Upper respiratory tract viruses"]),
            recommended_tests: strings(&["Nasal swab", "CBC"]),
            possible_treatments: strings(&["Antivirals", "Fever reducers", "Vitamin C supplements"]),
            note: None,
        },
        _ => DetailedAnalysis {
            note: Some("No additional detailed information is available for this condition".to_string()),
            ..DetailedAnalysis::default()
        },
    }
}

/// Prediction delay configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorConfig {
    /// Artificial delay before a prediction resolves
    pub delay: Duration,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self { delay: DEFAULT_PREDICTION_DELAY }
    }
}

impl PredictorConfig {
    /// Configuration with no artificial delay
    pub fn without_delay() -> Self {
        Self { delay: Duration::ZERO }
    }
}

/// Trait for prediction service operations
#[async_trait]
pub trait PredictionServiceTrait: Send + Sync {
    /// Deferred prediction for a snapshot
    async fn predict(&self, snapshot: &VitalsSnapshot) -> PredictionResult;

    /// Detail for a condition
    fn detailed_analysis(&self, condition: Condition) -> DetailedAnalysis {
        detailed_analysis(condition)
    }
}

/// Prediction service wrapping the rule table behind an async interface
#[derive(Debug, Clone, Default)]
pub struct PredictionService {
    config: PredictorConfig,
}

impl PredictionService {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }
}

#[async_trait]
impl PredictionServiceTrait for PredictionService {
    async fn predict(&self, snapshot: &VitalsSnapshot) -> PredictionResult {
        if !self.config.delay.is_zero() {
            tokio::time::sleep(self.config.delay).await;
        }

        let result = predict(snapshot);
        info!(condition = %result.condition, confidence = result.confidence, "Prediction completed");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(heart_rate: f64, temperature: f64, oxygen_level: f64) -> VitalsSnapshot {
        VitalsSnapshot::from_values(heart_rate, temperature, oxygen_level, Utc::now()).unwrap()
    }

    #[test]
    fn test_pneumonia_wins_over_tachycardia() {
        let result = predict(&snapshot(105.0, 38.5, 93.0));
        assert_eq!(result.condition, Condition::Pneumonia);
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.symptoms.len(), 5);
    }

    #[test]
    fn test_flu_when_oxygen_is_normal() {
        let result = predict(&snapshot(110.0, 38.4, 95.0));
        assert_eq!(result.condition, Condition::FluOrViralInfection);
        assert_eq!(result.confidence, 0.78);
    }

    #[test]
    fn test_hypothermia() {
        let result = predict(&snapshot(55.0, 35.5, 97.0));
        assert_eq!(result.condition, Condition::Hypothermia);
        assert_eq!(result.confidence, 0.82);
    }

    #[test]
    fn test_hypothermia_precedes_hypoxia() {
        let result = predict(&snapshot(55.0, 35.5, 85.0));
        assert_eq!(result.condition, Condition::Hypothermia);
    }

    #[test]
    fn test_hypoxia() {
        let result = predict(&snapshot(70.0, 37.0, 91.0));
        assert_eq!(result.condition, Condition::Hypoxia);
        assert_eq!(result.confidence, 0.90);
        assert!(result.advice.contains("emergency"));
    }

    #[test]
    fn test_tachycardia_without_fever() {
        let result = predict(&snapshot(115.0, 37.0, 97.0));
        assert_eq!(result.condition, Condition::Tachycardia);
        assert_eq!(result.confidence, 0.65);
    }

    #[test]
    fn test_fast_pulse_with_mild_fever_falls_through() {
        // 37.5..=38.0 is neither fever for rule 1/2 nor low enough for rule 5
        let result = predict(&snapshot(115.0, 37.8, 97.0));
        assert_eq!(result.condition, Condition::NoClearCondition);
    }

    #[test]
    fn test_normal_vitals_hit_catch_all() {
        let result = predict(&snapshot(75.0, 36.8, 97.0));
        assert_eq!(result.condition, Condition::NoClearCondition);
        assert_eq!(result.confidence, 0.40);
        assert_eq!(result.symptoms.len(), 2);
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let order: Vec<Condition> = rules().map(|r| r.condition).collect();
        assert_eq!(order, vec![
            Condition::Pneumonia,
            Condition::FluOrViralInfection,
            Condition::Hypothermia,
            Condition::Hypoxia,
            Condition::Tachycardia,
            Condition::NoClearCondition,
        ]);
        assert!(rules().all(|r| (0.0..=1.0).contains(&r.confidence)));
    }

    #[test]
    fn test_detailed_analysis() {
        let detail = detailed_analysis(Condition::Pneumonia);
        assert_eq!(detail.recommended_tests.len(), 3);
        assert!(detail.note.is_none());

        let detail = detailed_analysis(Condition::Tachycardia);
        assert!(detail.possible_causes.is_empty());
        assert!(detail.note.is_some());
    }

    #[tokio::test]
    async fn test_service_without_delay() {
        let service = PredictionService::new(PredictorConfig::without_delay());
        let result = service.predict(&snapshot(70.0, 37.0, 91.0)).await;
        assert_eq!(result.condition, Condition::Hypoxia);
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_honours_delay() {
        let service = PredictionService::new(PredictorConfig::default());
        let started = tokio::time::Instant::now();
        let result = service.predict(&snapshot(75.0, 36.8, 97.0)).await;
        assert_eq!(result.condition, Condition::NoClearCondition);
        assert!(started.elapsed() >= DEFAULT_PREDICTION_DELAY);
    }
}
