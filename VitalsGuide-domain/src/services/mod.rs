pub mod classifier;
pub mod predictor;
pub mod simulation;
pub mod snapshot;
pub mod alerts;
pub mod analysis;
pub mod generator;
pub mod vitals;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use classifier::classify;
pub use predictor::{predict, PredictionService, PredictionServiceTrait, PredictorConfig};
pub use simulation::{ReadingCallback, ReadingSimulator, SimulationConfig, SimulationHandle};
pub use snapshot::SnapshotStore;
pub use alerts::evaluate_alert;
pub use vitals::{create_default_vitals_service, VitalsService, VitalsServiceError, VitalsServiceTrait};
