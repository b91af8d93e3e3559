// Declare submodules
pub mod user_models;
pub mod user_dto;
pub mod user_repository;
pub mod user_handlers;

// Re-export public items
pub use user_models::{FingerprintStatus, Program, User, UserResponse, UserRole};
pub use user_repository::UserRepository;
