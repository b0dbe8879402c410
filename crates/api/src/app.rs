use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use persistence::storage::ArtifactStore;
use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_auth, trace_id};
use crate::routes::{auth, bookings, confirm, events, health};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub artifacts: Arc<ArtifactStore>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let jwt = Arc::new(JwtConfig::from_secret(
        &config.auth.jwt_secret,
        config.auth.token_expiry_secs,
    ));
    let artifacts = Arc::new(ArtifactStore::new(
        &config.storage.upload_dir,
        config.storage.io_timeout_secs,
    ));
    let request_timeout = config.server.request_timeout_secs;
    let cors_origins = config.security.cors_origins.clone();

    let state = AppState {
        pool,
        config: Arc::new(config),
        jwt,
        artifacts,
    };

    // Empty allow-list means any origin (development); production pins
    // the frontend origins in config.
    let cors = if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes: every event/booking management operation sits
    // behind the bearer-token gate.
    let protected_routes = Router::new()
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route(
            "/api/events/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/events/:id/availability",
            get(events::get_availability),
        )
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking)
                .patch(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route(
            "/api/bookings/:id/payment-file",
            get(bookings::get_payment_file).post(bookings::upload_payment_file),
        )
        .route(
            "/api/bookings/:id/confirmation-link",
            post(bookings::issue_confirmation_link),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes: login, one-time link redemption, health, metrics.
    let public_routes = Router::new()
        .route("/api/auth/token", post(auth::login))
        .route("/confirm/:token", get(confirm::confirm))
        .route("/api/health", get(health::health_check))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
