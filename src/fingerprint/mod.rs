// Declare submodules
pub mod fingerprint_handlers;
pub mod sensor;

// Re-export public items
pub use sensor::{SensorClient, SensorEnrollmentStatus};
