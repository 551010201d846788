//! Forecourt Server - Dealership Booking System
//!
//! A Rust REST API server for service bay, sales appointment and vehicle
//! hire bookings.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forecourt_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

/// How often expired drafts are garbage-collected
const DRAFT_PURGE_INTERVAL_SECS: u64 = 900;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("forecourt_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Forecourt Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository,
        config.booking.clone(),
        config.email.clone(),
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Periodically purge expired drafts
    let purge_services = state.services.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(DRAFT_PURGE_INTERVAL_SECS));
        loop {
            interval.tick().await;
            match purge_services.drafts.purge_expired().await {
                Ok(0) => {}
                Ok(count) => tracing::info!("Purged {} expired draft bookings", count),
                Err(e) => tracing::warn!("Draft purge failed: {}", e),
            }
        }
    });

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Resources
        .route("/resources", get(api::resources::list_resources))
        .route("/resources/:id", get(api::resources::get_resource))
        // Availability
        .route("/availability/slots", get(api::availability::available_slots))
        .route("/availability/dates", get(api::availability::available_dates))
        // Draft booking flow
        .route("/drafts", post(api::drafts::start_draft))
        .route("/drafts/:token", get(api::drafts::get_draft))
        .route("/drafts/:token/schedule", put(api::drafts::set_schedule))
        .route("/drafts/:token/details", put(api::drafts::set_details))
        .route("/drafts/:token/add-ons", put(api::drafts::set_add_ons))
        .route("/drafts/:token/payment", put(api::drafts::set_payment_choice))
        .route("/drafts/:token/payments", post(api::payments::record_payment))
        .route("/drafts/:token/convert", post(api::drafts::convert_draft))
        // Payments
        .route("/payments/:id", get(api::payments::get_payment))
        // Bookings
        .route("/bookings/:reference", get(api::bookings::get_booking))
        .route("/bookings/:reference/cancel", post(api::bookings::cancel_booking))
        // Settings
        .route("/settings/policy", get(api::settings::get_policy))
        .route("/settings/policy", put(api::settings::update_policy))
        .route("/settings/blocked-ranges", get(api::settings::list_blocked_ranges))
        .route("/settings/blocked-ranges", post(api::settings::create_blocked_range))
        .route("/settings/blocked-ranges/:id", delete(api::settings::delete_blocked_range))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
