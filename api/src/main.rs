//! Tutorgate API Server
//!
//! Entitlement and booking core for a tutoring course: tracks reading
//! progress, unlocks live sessions, books them against professor availability
//! and sends chapter homework.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    EmailClient, PostgresAvailabilityRepository, PostgresBookingRepository,
    PostgresHomeworkRepository, PostgresLearnerRepository, PostgresNotificationLogRepository,
    PostgresProfessorRepository, PostgresProgressRepository,
};
use app::{AvailabilityService, BookingService, HomeworkDispatcher, ProgressService};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub progress_service: Arc<ProgressService<PostgresProgressRepository>>,
    pub availability_service:
        Arc<AvailabilityService<PostgresAvailabilityRepository, PostgresProfessorRepository>>,
    pub booking_service: Arc<
        BookingService<
            PostgresBookingRepository,
            PostgresAvailabilityRepository,
            PostgresLearnerRepository,
            PostgresProfessorRepository,
            PostgresProgressRepository,
        >,
    >,
    pub homework_dispatcher: Arc<
        HomeworkDispatcher<
            PostgresHomeworkRepository,
            PostgresNotificationLogRepository,
            PostgresLearnerRepository,
            EmailClient,
        >,
    >,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tutorgate_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting tutorgate API...");

    // Load configuration
    let config = Config::from_env()?;
    if !config.email_enabled() {
        tracing::warn!("EMAIL_API_URL not set, homework emails will be logged as not sent");
    }

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let learner_repo = Arc::new(PostgresLearnerRepository::new(db.clone()));
    let professor_repo = Arc::new(PostgresProfessorRepository::new(db.clone()));
    let progress_repo = Arc::new(PostgresProgressRepository::new(db.clone()));
    let availability_repo = Arc::new(PostgresAvailabilityRepository::new(db.clone()));
    let booking_repo = Arc::new(PostgresBookingRepository::new(db.clone()));
    let homework_repo = Arc::new(PostgresHomeworkRepository::new(db.clone()));
    let notification_repo = Arc::new(PostgresNotificationLogRepository::new(db.clone()));

    let email_client = Arc::new(EmailClient::from_config(
        config.email_api_url.clone(),
        config.email_api_token.clone(),
    ));

    // Create application services
    let homework_dispatcher = Arc::new(HomeworkDispatcher::new(
        homework_repo,
        notification_repo,
        learner_repo.clone(),
        email_client,
    ));

    let progress_service = Arc::new(
        ProgressService::new(progress_repo, Arc::new(config.curriculum.clone()))
            .with_listener(homework_dispatcher.clone()),
    );

    let availability_service = Arc::new(AvailabilityService::new(
        availability_repo.clone(),
        professor_repo.clone(),
    ));

    let booking_service = Arc::new(BookingService::new(
        booking_repo,
        availability_repo,
        learner_repo,
        professor_repo,
        progress_service.clone(),
        config.schedule_offset,
    ));

    // Create app state
    let state = AppState {
        progress_service,
        availability_service,
        booking_service,
        homework_dispatcher,
    };

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    // Rate-limited routes (reservations)
    let rate_limited_routes = Router::new()
        .route("/bookings", post(handlers::reserve))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        // Progress (content delivery)
        .route(
            "/learners/:id/pages/:page/toggle",
            post(handlers::toggle_page),
        )
        .route(
            "/learners/:id/quizzes/:chapter/toggle",
            post(handlers::toggle_quiz),
        )
        .route("/learners/:id/progress", get(handlers::get_progress))
        .route(
            "/learners/:id/unlock-status",
            get(handlers::get_unlock_status),
        )
        // Bookings (booking UI)
        .route("/learners/:id/bookings", get(handlers::list_learner_bookings))
        .route("/bookings/:id/cancel", post(handlers::cancel))
        // Availability (professor UI)
        .route(
            "/professors/:id/availability",
            get(handlers::list_availability).post(handlers::publish_availability),
        )
        .route("/availability/:id", delete(handlers::retract_availability))
        // Operator view
        .route(
            "/notifications/failed",
            get(handlers::list_failed_notifications),
        )
        .merge(rate_limited_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
