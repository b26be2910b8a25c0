// Public entities for the VitalsGuide API
// This module contains data structures that are shared across the application boundary

// Request and response payloads for vitals, predictions and reports
pub mod vitals;

// Common entities for error handling, pagination, etc.
pub mod common;
