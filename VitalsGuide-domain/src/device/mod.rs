//! Device abstraction
//!
//! The dashboard only consumes `Reading` events; where they come from sits
//! behind `VitalsDevice`. `SimulatedDevice` feeds it from the reading simulator.

use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::vitals::Reading;
use crate::services::simulation::{ReadingSimulator, SimulationConfig};

/// Identity of a discoverable device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
}

/// Device errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    #[error("No device is connected")]
    NotConnected,

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("Device {0} is already connected")]
    AlreadyConnected(String),
}

/// Subscriber for readings from a connected device
pub type ReadingListener = Arc<dyn Fn(Reading) + Send + Sync + 'static>;

/// Capability interface of a vitals device
#[async_trait]
pub trait VitalsDevice: Send + Sync {
    /// Whether this kind of device can be used at all
    fn is_supported(&self) -> bool;

    /// Discover devices that can be connected
    async fn scan_for_devices(&self) -> Result<Vec<DeviceInfo>, DeviceError>;

    /// Connect and start streaming readings to the registered listener
    async fn connect(&self, device_id: &str) -> Result<DeviceInfo, DeviceError>;

    /// Stop streaming. Disconnecting an idle device is a no-op.
    async fn disconnect(&self) -> Result<(), DeviceError>;

    /// Register the single reading listener, replacing any previous one
    fn on_reading(&self, listener: ReadingListener);

    /// The connected device
    fn connected_device(&self) -> Result<DeviceInfo, DeviceError>;

    fn is_connected(&self) -> bool {
        self.connected_device().is_ok()
    }
}

/// Device backed by the reading simulator
///
/// The listener is looked up on every emission, so registering a new one
/// takes effect on a running stream.
pub struct SimulatedDevice {
    info: DeviceInfo,
    simulator: Mutex<ReadingSimulator>,
    listener: Arc<RwLock<Option<ReadingListener>>>,
}

impl SimulatedDevice {
    pub const DEFAULT_ID: &'static str = "simulated-vitals-monitor";

    pub fn new(config: SimulationConfig) -> Self {
        Self {
            info: DeviceInfo {
                id: Self::DEFAULT_ID.to_string(),
                name: "Simulated Vitals Monitor".to_string(),
            },
            simulator: Mutex::new(ReadingSimulator::new(config)),
            listener: Arc::new(RwLock::new(None)),
        }
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn simulator(&self) -> std::sync::MutexGuard<'_, ReadingSimulator> {
        match self.simulator.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl std::fmt::Debug for SimulatedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedDevice")
            .field("info", &self.info)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl VitalsDevice for SimulatedDevice {
    fn is_supported(&self) -> bool {
        true
    }

    async fn scan_for_devices(&self) -> Result<Vec<DeviceInfo>, DeviceError> {
        Ok(vec![self.info.clone()])
    }

    async fn connect(&self, device_id: &str) -> Result<DeviceInfo, DeviceError> {
        if device_id != self.info.id {
            warn!("Connection requested to unknown device {}", device_id);
            return Err(DeviceError::UnknownDevice(device_id.to_string()));
        }

        let listener = self.listener.clone();
        let started = self.simulator().start(Box::new(move |reading| {
            let current = match listener.read() {
                Ok(guard) => guard.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            };
            if let Some(listener) = current {
                listener(reading);
            }
        }));

        if !started {
            return Err(DeviceError::AlreadyConnected(self.info.id.clone()));
        }

        info!("Connected to {}", self.info.name);
        Ok(self.info.clone())
    }

    async fn disconnect(&self) -> Result<(), DeviceError> {
        let mut simulator = self.simulator();
        if simulator.is_running() {
            simulator.stop();
            info!("Disconnected from {}", self.info.name);
        }
        Ok(())
    }

    fn on_reading(&self, listener: ReadingListener) {
        let mut slot = match self.listener.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(listener);
    }

    fn connected_device(&self) -> Result<DeviceInfo, DeviceError> {
        if self.simulator().is_running() {
            Ok(self.info.clone())
        } else {
            Err(DeviceError::NotConnected)
        }
    }
}
