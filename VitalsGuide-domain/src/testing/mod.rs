// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use vitals_guide_data::repository::tests::MockVitalsHistoryRepository;

use std::sync::{Arc, Mutex};
use std::collections::HashMap;
use async_trait::async_trait;

use crate::entities::prediction::{Condition, PredictionResult};
use crate::entities::vitals::{Reading, VitalsSnapshot};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};
use crate::services::predictor::{predict, PredictionServiceTrait};
use crate::services::simulation::ReadingCallback;

/// Callback that appends every reading to a shared vector
pub fn recording_callback() -> (ReadingCallback, Arc<Mutex<Vec<Reading>>>) {
    let readings = Arc::new(Mutex::new(Vec::new()));
    let sink = readings.clone();
    let callback: ReadingCallback = Box::new(move |reading| {
        let mut guard = match sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(reading);
    });
    (callback, readings)
}

/// Mock implementation of the PredictionServiceTrait for testing
///
/// Answers immediately, either with the rule table or with a fixed result.
#[derive(Debug, Default)]
pub struct MockPredictionService {
    fixed: Option<PredictionResult>,
    calls: Mutex<Vec<VitalsSnapshot>>,
}

impl MockPredictionService {
    /// Create a new mock that evaluates the rule table without delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to always answer with `condition`
    pub fn with_condition(mut self, condition: Condition, confidence: f64) -> Self {
        self.fixed = Some(PredictionResult {
            condition,
            confidence,
            symptoms: Vec::new(),
            advice: format!("Mock advice for {}", condition),
        });
        self
    }

    /// Snapshots passed to `predict` so far
    pub fn calls(&self) -> Vec<VitalsSnapshot> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl PredictionServiceTrait for MockPredictionService {
    async fn predict(&self, snapshot: &VitalsSnapshot) -> PredictionResult {
        match self.calls.lock() {
            Ok(mut guard) => guard.push(snapshot.clone()),
            Err(poisoned) => poisoned.into_inner().push(snapshot.clone()),
        }

        match &self.fixed {
            Some(result) => result.clone(),
            None => predict(snapshot),
        }
    }
}

/// Mock implementation of the HealthServiceTrait for testing
#[derive(Debug, Clone)]
pub struct MockHealthService {
    /// History component status
    history_status: ComponentStatus,
    /// Additional components
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            history_status: ComponentStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with an unhealthy history store
    pub fn with_unhealthy_history(mut self) -> Self {
        self.history_status = ComponentStatus::Unhealthy;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components.insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = self.components.clone();
        components.insert(
            "history".to_string(),
            HealthComponent {
                status: self.history_status.clone(),
                details: match self.history_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("History store is slow".to_string()),
                    ComponentStatus::Unhealthy => Some("History store unavailable".to_string()),
                },
            },
        );

        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        SystemHealth { status, components }
    }

    async fn check_history_status(&self) -> Result<usize, String> {
        match self.history_status {
            ComponentStatus::Unhealthy => Err("History store unavailable".to_string()),
            _ => Ok(0),
        }
    }
}
