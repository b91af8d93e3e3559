// Declare submodules
pub mod auth;

// Re-export public items
pub use auth::{auth_middleware, CurrentUser};
