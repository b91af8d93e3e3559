// Declare existing modules
pub mod jwt;
pub mod password;

// Declare submodules
pub mod auth_models;
pub mod auth_dto;
pub mod auth_repository;
pub mod auth_handlers;
pub mod auth_service;

// Re-export public items
pub use jwt::{create_access_token, verify_jwt};
pub use password::{hash_password, verify_password};
