// Repository module structure
pub mod errors;
mod in_memory;
mod vitals_history;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStorage;
pub use vitals_history::{VitalsHistoryRepository, VitalsHistoryRepositoryTrait};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use vitals_history::tests;
