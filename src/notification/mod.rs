// Declare submodules
pub mod dispatch;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_handlers;
pub mod notification_service;

// Re-export public items
pub use dispatch::DispatchLedger;
pub use notification_models::Notification;
pub use notification_repository::NotificationRepository;
pub use notification_service::start_notification_service;
