mod auth;
mod db;
mod error;
mod event;
mod fingerprint;
mod mailer;
mod middleware;
mod notification;
mod routes;
mod state;
mod user;
mod websocket;

use db::{create_pool, run_migrations};
use notification::start_notification_service;
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,attendance_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    // Create database connection pool
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    // Run migrations
    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Create repositories
    let user_repository = crate::user::UserRepository::new(db.clone());
    let event_repository = crate::event::EventRepository::new(db.clone());
    let notification_repository =
        crate::notification::NotificationRepository::new(db.clone());
    let password_reset_repository =
        crate::auth::auth_repository::PasswordResetRepository::new(db.clone());

    // Create services
    let mailer = crate::mailer::Mailer::new(&config)?;
    let auth_service = crate::auth::auth_service::AuthService::new(
        user_repository.clone(),
        password_reset_repository,
        mailer,
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    );
    let sensor = crate::fingerprint::SensorClient::new(config.sensor_url.clone())?;

    // Create application state
    let state = AppState {
        config: config.clone(),
        user_repository,
        event_repository,
        notification_repository,
        auth_service,
        ws_connections: crate::websocket::ConnectionManager::new(),
        dispatch_ledger: crate::notification::DispatchLedger::new(),
        sensor,
    };

    // Start notification service
    let notification_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = start_notification_service(notification_state).await {
            tracing::error!("Notification service error: {:?}", e);
        }
    });

    // Create router
    let app = create_router(state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
