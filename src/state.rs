use std::sync::Arc;

use crate::auth::auth_service::AuthService;
use crate::event::EventRepository;
use crate::fingerprint::SensorClient;
use crate::notification::{DispatchLedger, NotificationRepository};
use crate::user::UserRepository;
use crate::websocket::ConnectionManager;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_repository: UserRepository,
    pub event_repository: EventRepository,
    pub notification_repository: NotificationRepository,
    pub auth_service: AuthService,
    pub ws_connections: ConnectionManager,
    pub dispatch_ledger: DispatchLedger,
    pub sensor: SensorClient,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub sensor_url: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            sensor_url: std::env::var("SENSOR_URL")
                .unwrap_or_else(|_| "http://192.168.1.100".to_string()),
            smtp_host: std::env::var("SMTP_HOST")
                .expect("SMTP_HOST must be set"),
            smtp_port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .expect("SMTP_PORT must be a number"),
            smtp_user: std::env::var("SMTP_USER")
                .expect("SMTP_USER must be set"),
            smtp_password: std::env::var("SMTP_PASSWORD")
                .expect("SMTP_PASSWORD must be set"),
            frontend_origin: std::env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }
}
