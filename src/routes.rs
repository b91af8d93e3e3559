use crate::{
    auth::auth_dto::*,
    auth::auth_handlers,
    event::event_dto::*,
    event::event_handlers,
    event::Event,
    fingerprint::fingerprint_handlers,
    fingerprint::SensorEnrollmentStatus,
    middleware::auth_middleware,
    notification::notification_handlers,
    notification::Notification,
    state::AppState,
    user::user_dto::ProgramCount,
    user::user_handlers,
    user::{FingerprintStatus, Program, User, UserResponse, UserRole},
    websocket::ws_handler,
};
use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::forgot_password,
        auth_handlers::reset_password,
        event_handlers::create_event,
        event_handlers::get_events,
        event_handlers::update_event,
        event_handlers::delete_event,
        notification_handlers::get_notifications,
        notification_handlers::mark_notification_read,
        notification_handlers::delete_notification,
        notification_handlers::delete_all_notifications,
        user_handlers::get_program_counts,
        user_handlers::get_students_by_program,
        fingerprint_handlers::trigger_fingerprint_enrollment,
        fingerprint_handlers::get_enrollment_status,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            CreateEventRequest,
            UpdateEventRequest,
            User,
            UserResponse,
            UserRole,
            Program,
            FingerprintStatus,
            Event,
            Notification,
            ProgramCount,
            SensorEnrollmentStatus,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "events", description = "Campus event management endpoints"),
        (name = "notifications", description = "Notification endpoints"),
        (name = "programs", description = "Program roster endpoints"),
        (name = "fingerprints", description = "Fingerprint enrollment endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

async fn root() -> &'static str {
    "Backend is running"
}

pub fn create_router(state: AppState) -> Router {
    let origin = state
        .config
        .frontend_origin
        .parse::<HeaderValue>()
        .expect("FRONTEND_ORIGIN must be a valid origin");

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/logout", post(auth_handlers::logout))
        .route("/forgot-password", post(auth_handlers::forgot_password))
        .route("/reset-password", post(auth_handlers::reset_password));

    // Protected routes (auth required)
    let event_routes = Router::new()
        .route(
            "/",
            get(event_handlers::get_events).post(event_handlers::create_event),
        )
        .route(
            "/:id",
            put(event_handlers::update_event).delete(event_handlers::delete_event),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let notification_routes = Router::new()
        .route(
            "/",
            get(notification_handlers::get_notifications)
                .delete(notification_handlers::delete_all_notifications),
        )
        .route(
            "/:id/read",
            patch(notification_handlers::mark_notification_read),
        )
        .route("/:id", delete(notification_handlers::delete_notification))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let program_routes = Router::new()
        .route("/counts", get(user_handlers::get_program_counts))
        .route(
            "/:program_code/students",
            get(user_handlers::get_students_by_program),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let fingerprint_routes = Router::new()
        .route(
            "/enroll/:user_id",
            post(fingerprint_handlers::trigger_fingerprint_enrollment),
        )
        .route(
            "/enrollment-status/:user_id",
            get(fingerprint_handlers::get_enrollment_status),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/events", event_routes)
        .nest("/notifications", notification_routes)
        .nest("/programs", program_routes)
        .nest("/fingerprints", fingerprint_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .route("/ws/notifications", get(ws_handler))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::auth_repository::PasswordResetRepository;
    use crate::auth::auth_service::AuthService;
    use crate::event::EventRepository;
    use crate::fingerprint::SensorClient;
    use crate::mailer::Mailer;
    use crate::notification::{DispatchLedger, NotificationRepository};
    use crate::state::Config;
    use crate::user::UserRepository;
    use crate::websocket::ConnectionManager;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let config = Arc::new(Config {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 24,
            sensor_url: "http://192.168.1.100".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: "noreply@example.com".to_string(),
            smtp_password: "password123".to_string(),
            frontend_origin: "http://localhost:5173".to_string(),
        });

        // Lazy pool: no connection is made until a query runs, and these
        // tests never run one.
        let db = crate::db::DbPool::connect_lazy("postgres://postgres@localhost/test")
            .expect("lazy pool");

        let user_repository = UserRepository::new(db.clone());
        let event_repository = EventRepository::new(db.clone());
        let notification_repository = NotificationRepository::new(db.clone());
        let password_reset_repository = PasswordResetRepository::new(db.clone());
        let mailer = Mailer::new(&config).expect("mailer");
        let auth_service = AuthService::new(
            user_repository.clone(),
            password_reset_repository,
            mailer,
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
        );
        let sensor = SensorClient::new(config.sensor_url.clone()).expect("sensor client");

        AppState {
            config,
            user_repository,
            event_repository,
            notification_repository,
            auth_service,
            ws_connections: ConnectionManager::new(),
            dispatch_ledger: DispatchLedger::new(),
            sensor,
        }
    }

    #[tokio::test]
    async fn test_root_reports_liveness() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Backend is running");
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer_token() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/notifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_bearer_token_is_rejected() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events")
                    .header("Authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
