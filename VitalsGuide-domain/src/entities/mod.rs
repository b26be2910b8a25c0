// Domain entities and value objects
pub mod vitals;
pub mod prediction;
pub mod report;
pub mod conversions;

// Re-export common types for easier imports
pub use vitals::{validate_value, HistoryEntry, Reading, Vital, VitalStatus, VitalType, VitalsError, VitalsSnapshot};
pub use prediction::{Condition, DetailedAnalysis, PredictionResult};
pub use report::{DailyAverage, HistoryComparison, Trend, VitalAlert, VitalChange, VitalStatistics, VitalsReport};
