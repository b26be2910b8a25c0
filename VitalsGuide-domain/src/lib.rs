// VitalsGuide Domain
// This crate contains the business logic for the VitalsGuide application

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Device abstraction and the simulated device
pub mod device;

// Health checks and system status
pub mod health;

// Re-export the repository module from the data crate for convenience
pub use vitals_guide_data::repository;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
