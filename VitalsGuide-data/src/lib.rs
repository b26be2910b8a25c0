// VitalsGuide Data
// This crate handles storage of recorded vitals snapshots

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
