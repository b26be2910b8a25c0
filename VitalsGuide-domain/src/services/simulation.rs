//! Simulated device reading stream
//!
//! Emits synthetic heart rate, temperature and oxygen readings on three
//! independent fixed periods. All three timers live in one spawned task, so
//! stopping the stream cancels them as a unit.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::entities::vitals::{Reading, VitalType};

/// Receiver of simulated readings
pub type ReadingCallback = Box<dyn FnMut(Reading) + Send + 'static>;

type CallbackSlot = Arc<Mutex<Option<ReadingCallback>>>;

/// Emission periods for each vital
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub heart_rate_period: Duration,
    pub temperature_period: Duration,
    pub oxygen_level_period: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            heart_rate_period: Duration::from_secs(3),
            temperature_period: Duration::from_secs(10),
            oxygen_level_period: Duration::from_secs(5),
        }
    }
}

impl SimulationConfig {
    pub fn period(&self, vital_type: VitalType) -> Duration {
        match vital_type {
            VitalType::HeartRate => self.heart_rate_period,
            VitalType::Temperature => self.temperature_period,
            VitalType::OxygenLevel => self.oxygen_level_period,
        }
    }
}

/// Uniform integer bpm in [60, 100)
pub fn simulate_heart_rate<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(60u32..100))
}

/// Uniform °C in [36, 38), rounded to one decimal
pub fn simulate_temperature<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.gen_range(36.0..38.0_f64) * 10.0).round() / 10.0
}

/// Uniform integer percent in [94, 100)
pub fn simulate_oxygen_level<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(94u32..100))
}

/// One synthetic reading stamped with the current time
pub fn simulate_reading<R: Rng + ?Sized>(vital_type: VitalType, rng: &mut R) -> Reading {
    let value = match vital_type {
        VitalType::HeartRate => simulate_heart_rate(rng),
        VitalType::Temperature => simulate_temperature(rng),
        VitalType::OxygenLevel => simulate_oxygen_level(rng),
    };

    Reading {
        vital_type,
        value,
        timestamp: Utc::now(),
    }
}

/// Invoke the callback if the stream is still live; false once stopped
fn emit(slot: &CallbackSlot, reading: Reading) -> bool {
    let mut guard = match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    match guard.as_mut() {
        Some(callback) => {
            callback(reading);
            true
        }
        None => false,
    }
}

async fn run_timers(config: SimulationConfig, slot: CallbackSlot) {
    let start = Instant::now();
    let mut timers = VitalType::ALL.map(|vital_type| {
        // zero periods would make tokio panic
        let period = config.period(vital_type).max(Duration::from_millis(1));
        let mut timer = interval_at(start + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    });
    let [heart_rate, temperature, oxygen_level] = &mut timers;

    loop {
        let vital_type = tokio::select! {
            _ = heart_rate.tick() => VitalType::HeartRate,
            _ = temperature.tick() => VitalType::Temperature,
            _ = oxygen_level.tick() => VitalType::OxygenLevel,
        };

        let reading = {
            let mut rng = rand::thread_rng();
            simulate_reading(vital_type, &mut rng)
        };
        debug!(vital = %reading.vital_type, value = reading.value, "Simulated reading");

        if !emit(&slot, reading) {
            break;
        }
    }
}

/// Owned handle to a running simulation
///
/// Dropping the handle stops the simulation.
pub struct SimulationHandle {
    slot: CallbackSlot,
    task: Option<JoinHandle<()>>,
}

impl SimulationHandle {
    /// Spawn the three timers on the current tokio runtime
    pub fn start(config: SimulationConfig, callback: ReadingCallback) -> Self {
        let slot: CallbackSlot = Arc::new(Mutex::new(Some(callback)));
        let task = tokio::spawn(run_timers(config, slot.clone()));
        info!("Reading simulation started");

        Self {
            slot,
            task: Some(task),
        }
    }

    /// Cancel every timer. Idempotent.
    ///
    /// The callback is removed under the same lock the timers take to emit,
    /// so once this returns no further reading is delivered.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        let callback = match self.slot.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        task.abort();
        drop(callback);

        info!("Reading simulation stopped");
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// idle -> running -> idle state machine around `SimulationHandle`
#[derive(Default)]
pub struct ReadingSimulator {
    config: SimulationConfig,
    handle: Option<SimulationHandle>,
}

impl ReadingSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config, handle: None }
    }

    /// Start emitting; returns false and does nothing when already running
    pub fn start(&mut self, callback: ReadingCallback) -> bool {
        if self.is_running() {
            warn!("Reading simulation already running; start ignored");
            return false;
        }

        self.handle = Some(SimulationHandle::start(self.config.clone(), callback));
        true
    }

    /// Stop emitting. Safe to call when idle.
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, SimulationHandle::is_running)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
