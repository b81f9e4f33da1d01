//! Locations API Server
//!
//! REST backend for a hierarchy of physical storage locations (buildings,
//! rooms, shelves).
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::Uri,
    routing::{get, post},
    Json, Router,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde::Serialize;
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


use adapters::PostgresLocationRepository;
use app::LocationService;
use config::Config;
use domain::ports::LocationRepository;
use error::AppError;

/// Application state shared across all handlers
pub struct AppState<LR>
where
    LR: LocationRepository,
{
    pub location_service: Arc<LocationService<LR>>,
}

impl<LR> Clone for AppState<LR>
where
    LR: LocationRepository,
{
    fn clone(&self) -> Self {
        Self {
            location_service: self.location_service.clone(),
        }
    }
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

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Build the HTTP router over any location repository
pub fn router<LR>(state: AppState<LR>) -> Router
where
    LR: LocationRepository + 'static,
{
    Router::new()
        // Health check
        .route("/health", get(health))
        // Locations
        .route(
            "/locations",
            post(handlers::create_location::<LR>).get(handlers::list_locations::<LR>),
        )
        .route(
            "/locations/:id",
            get(handlers::get_location::<LR>)
                .patch(handlers::update_location::<LR>)
                .delete(handlers::delete_location::<LR>),
        )
        .fallback(fallback)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,locations_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Locations API...");

    // Load configuration
    let config = Config::from_env().context("Invalid configuration")?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.auto_migrate {
        tracing::info!("Applying pending migrations...");
        Migrator::up(&db, None)
            .await
            .context("Failed to apply migrations")?;
    }

    // Create adapters and services
    let location_repo = Arc::new(PostgresLocationRepository::new(db));
    let location_service = Arc::new(LocationService::new(location_repo));

    let app = router(AppState { location_service });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
