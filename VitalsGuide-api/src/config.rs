//! Environment driven application configuration

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use vitals_guide_domain::services::{PredictorConfig, SimulationConfig};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange { name: &'static str, value: u64, min: u64, max: u64 },
}

/// Upper bound for `HISTORY_DAYS`, matching the longest report window
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port
    pub port: u16,

    /// Delay applied to predictions
    pub prediction: PredictorConfig,

    /// Emission periods of the simulated device
    pub simulation: SimulationConfig,

    /// Connect the simulated device at boot
    pub simulation_autostart: bool,

    /// Days of synthetic history seeded at boot, also the default report window
    pub history_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            prediction: PredictorConfig::default(),
            simulation: SimulationConfig::default(),
            simulation_autostart: false,
            history_days: 7,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_millis(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_var(name, default_ms).map(Duration::from_millis)
}

fn parse_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue { name, value }),
        },
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let periods = &defaults.simulation;

        let history_days = parse_var("HISTORY_DAYS", defaults.history_days)?;
        if history_days > MAX_HISTORY_DAYS {
            return Err(ConfigError::OutOfRange {
                name: "HISTORY_DAYS",
                value: u64::from(history_days),
                min: 0,
                max: u64::from(MAX_HISTORY_DAYS),
            });
        }

        let config = Self {
            port: parse_var("PORT", defaults.port)?,
            prediction: PredictorConfig {
                delay: parse_millis("PREDICTION_DELAY_MS", defaults.prediction.delay)?,
            },
            simulation: SimulationConfig {
                heart_rate_period: parse_millis("HEART_RATE_PERIOD_MS", periods.heart_rate_period)?,
                temperature_period: parse_millis("TEMPERATURE_PERIOD_MS", periods.temperature_period)?,
                oxygen_level_period: parse_millis("OXYGEN_LEVEL_PERIOD_MS", periods.oxygen_level_period)?,
            },
            simulation_autostart: parse_flag("SIMULATION_AUTOSTART", defaults.simulation_autostart)?,
            history_days,
        };

        debug!(?config, "Loaded configuration");
        Ok(config)
    }

    /// Configuration for tests: no prediction delay, no autostart
    pub fn for_tests() -> Self {
        Self {
            prediction: PredictorConfig::without_delay(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.history_days, 7);
        assert!(!config.simulation_autostart);
        assert_eq!(config.prediction, PredictorConfig::default());
    }

    #[test]
    fn test_for_tests_has_no_delay() {
        let config = AppConfig::for_tests();
        assert!(config.prediction.delay.is_zero());
        assert_eq!(config.history_days, 7);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        // names unique to this test so parallel tests never see them
        std::env::set_var("VITALS_TEST_BAD_NUMBER", "abc");
        std::env::set_var("VITALS_TEST_BAD_FLAG", "maybe");
        std::env::set_var("VITALS_TEST_GOOD_FLAG", "TRUE");

        assert!(parse_var::<u16>("VITALS_TEST_BAD_NUMBER", 1).is_err());
        assert!(parse_flag("VITALS_TEST_BAD_FLAG", false).is_err());
        assert!(parse_flag("VITALS_TEST_GOOD_FLAG", false).unwrap());
        assert_eq!(parse_var::<u32>("VITALS_TEST_UNSET", 7).unwrap(), 7);

        std::env::set_var("VITALS_TEST_BAD_MILLIS", "abc");
        std::env::set_var("VITALS_TEST_NEGATIVE_MILLIS", "-5");
        std::env::set_var("VITALS_TEST_GOOD_MILLIS", "250");
        let default = Duration::from_secs(3);

        let err = parse_millis("VITALS_TEST_BAD_MILLIS", default).unwrap_err();
        assert!(err.to_string().contains("VITALS_TEST_BAD_MILLIS"));
        assert!(parse_millis("VITALS_TEST_NEGATIVE_MILLIS", default).is_err());
        assert_eq!(parse_millis("VITALS_TEST_GOOD_MILLIS", default).unwrap(), Duration::from_millis(250));
        assert_eq!(parse_millis("VITALS_TEST_UNSET_MILLIS", default).unwrap(), default);
    }

    #[test]
    fn test_from_env_rejects_bad_timing_and_history_values() {
        // the only test touching the real variable names
        for name in ["PREDICTION_DELAY_MS", "HEART_RATE_PERIOD_MS", "TEMPERATURE_PERIOD_MS", "OXYGEN_LEVEL_PERIOD_MS"] {
            std::env::set_var(name, "abc");
            let err = AppConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { name: n, .. } if n == name));
            std::env::remove_var(name);
        }

        std::env::set_var("HISTORY_DAYS", "100000");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "HISTORY_DAYS", value: 100000, .. }));

        std::env::set_var("HISTORY_DAYS", "365");
        std::env::set_var("PREDICTION_DELAY_MS", "0");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.history_days, MAX_HISTORY_DAYS);
        assert!(config.prediction.delay.is_zero());

        std::env::remove_var("HISTORY_DAYS");
        std::env::remove_var("PREDICTION_DELAY_MS");
    }
}
