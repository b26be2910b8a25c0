use std::fmt;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::vitals::{VitalStatus, VitalType};

/// Summary statistics for one vital over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalStatistics {
    pub vital_type: VitalType,

    /// Average rounded to one decimal
    pub average: f64,
    pub min: f64,
    pub max: f64,

    /// One sentence assessment of the average
    pub assessment: String,
}

/// Report over a set of historical snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalsReport {
    pub reading_count: usize,
    pub heart_rate: VitalStatistics,
    pub temperature: VitalStatistics,
    pub oxygen_level: VitalStatistics,
    pub recommendations: Vec<String>,
}

impl fmt::Display for VitalsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Based on the data collected, here's an analysis of your vital signs:")?;
        for stats in [&self.heart_rate, &self.temperature, &self.oxygen_level] {
            let unit = stats.vital_type.unit();
            let spacer = if unit == "bpm" { " " } else { "" };
            writeln!(f)?;
            writeln!(f, "{}:", stats.vital_type.label())?;
            writeln!(f, "- Average: {}{}{}", stats.average, spacer, unit)?;
            writeln!(f, "- Range: {} - {}{}{}", stats.min, stats.max, spacer, unit)?;
            writeln!(f, "- {}", stats.assessment)?;
        }
        writeln!(f)?;
        writeln!(f, "Recommendations:")?;
        for recommendation in &self.recommendations {
            writeln!(f, "- {}", recommendation)?;
        }
        Ok(())
    }
}

/// Average of one vital for one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub value: f64,
}

/// Direction of change against historical averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

/// Change of one vital against its historical average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalChange {
    /// Current minus historical average, rounded to one decimal
    pub change: f64,
    pub trend: Trend,
}

impl VitalChange {
    pub fn stable() -> Self {
        Self { change: 0.0, trend: Trend::Stable }
    }
}

/// Current snapshot compared against history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HistoryComparison {
    pub heart_rate: VitalChange,
    pub temperature: VitalChange,
    pub oxygen_level: VitalChange,
}

/// Alert summary for a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalAlert {
    /// Worst status across the snapshot
    pub level: VitalStatus,

    /// Vitals at that level
    pub vitals: Vec<VitalType>,

    pub message: String,
}
