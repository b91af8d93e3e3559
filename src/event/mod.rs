// Declare submodules
pub mod event_models;
pub mod event_dto;
pub mod event_repository;
pub mod event_handlers;

// Re-export public items
pub use event_models::Event;
pub use event_repository::EventRepository;
