//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;

use crate::device::VitalsDevice;
use vitals_guide_data::repository::VitalsHistoryRepositoryTrait;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the history store
    /// Returns the number of stored snapshots, or an error if it cannot be read
    async fn check_history_status(&self) -> Result<usize, String>;
}

/// Health checks over the history store and the vitals device
pub struct VitalsHealthService<R: VitalsHistoryRepositoryTrait> {
    repository: R,
    device: Arc<dyn VitalsDevice>,
}

impl<R: VitalsHistoryRepositoryTrait> VitalsHealthService<R> {
    pub fn new(repository: R, device: Arc<dyn VitalsDevice>) -> Self {
        Self { repository, device }
    }

    fn device_component(&self) -> HealthComponent {
        // without a device the API still serves history and predictions
        if !self.device.is_supported() {
            return HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Device is not supported".to_string()),
            };
        }

        let details = match self.device.connected_device() {
            Ok(info) => format!("Streaming from {}", info.name),
            Err(e) => e.to_string(),
        };
        HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(details),
        }
    }
}

#[async_trait]
impl<R: VitalsHistoryRepositoryTrait> HealthServiceTrait for VitalsHealthService<R> {
    async fn get_system_health(&self) -> SystemHealth {
        let history_component = match self.check_history_status().await {
            Ok(count) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(format!("{} snapshots stored", count)),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };
        let device_component = self.device_component();

        let overall_status = if history_component.status == ComponentStatus::Unhealthy {
            SystemStatus::Unhealthy
        } else if device_component.status == ComponentStatus::Degraded {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        SystemHealth {
            status: overall_status,
            components: vec![
                ("history".to_string(), history_component),
                ("device".to_string(), device_component),
            ].into_iter().collect(),
        }
    }

    async fn check_history_status(&self) -> Result<usize, String> {
        self.repository
            .count()
            .await
            .map_err(|e| format!("History store error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SimulatedDevice;
    use vitals_guide_data::repository::tests::MockVitalsHistoryRepository;

    #[tokio::test]
    async fn test_idle_device_is_healthy() {
        let service = VitalsHealthService::new(
            MockVitalsHistoryRepository::new(),
            Arc::new(SimulatedDevice::default()),
        );
        let health = service.get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);
        assert_eq!(health.components["history"].status, ComponentStatus::Healthy);
        assert_eq!(
            health.components["device"].details.as_deref(),
            Some("No device is connected")
        );
    }

    #[tokio::test]
    async fn test_connected_device_reports_its_name() {
        let device = Arc::new(SimulatedDevice::default());
        device.connect(SimulatedDevice::DEFAULT_ID).await.unwrap();

        let service = VitalsHealthService::new(MockVitalsHistoryRepository::new(), device.clone());
        let health = service.get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);
        assert_eq!(
            health.components["device"].details.as_deref(),
            Some("Streaming from Simulated Vitals Monitor")
        );

        device.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_history_is_unhealthy() {
        let service = VitalsHealthService::new(
            MockVitalsHistoryRepository::failing(),
            Arc::new(SimulatedDevice::default()),
        );
        let health = service.get_system_health().await;
        assert_eq!(health.status, SystemStatus::Unhealthy);
        assert!(service.check_history_status().await.is_err());
    }
}
