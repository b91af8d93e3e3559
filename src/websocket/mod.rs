// Declare submodules
pub mod connection;
pub mod handler;

// Re-export public items
pub use connection::ConnectionManager;
pub use handler::ws_handler;
