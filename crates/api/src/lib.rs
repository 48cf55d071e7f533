//! # Salon API
//!
//! The API crate provides the web server for the salon booking platform.
//! It exposes public catalogue and availability endpoints plus role-gated
//! endpoints for clients, barbers and admins.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and which role may call them
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Session resolution, password hashing and error mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.
//! Scheduling rules themselves live in `salon-core`.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use salon_api::ApiState;
/// # fn example(db_pool: sqlx::PgPool) {
/// let state = Arc::new(ApiState::new(db_pool, chrono_tz::Europe::Zurich));
/// # }
/// ```
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,

    /// Time zone the salon's opening hours are expressed in
    pub timezone: Tz,
}

impl ApiState {
    pub fn new(db_pool: PgPool, timezone: Tz) -> Self {
        Self { db_pool, timezone }
    }

    /// Wall-clock time at the salon.
    pub fn salon_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// Builds the application router with every route group, CORS and the
/// request timeout applied.
pub fn build_router(state: Arc<ApiState>, config: &config::ApiConfig) -> Result<Router> {
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Login
        .merge(routes::auth::routes())
        // Catalogue and availability, no session required
        .merge(routes::public::routes())
        // Role-gated groups
        .merge(routes::client::routes(state.clone()))
        .merge(routes::barber::routes(state.clone()))
        .merge(routes::admin::routes(state.clone()))
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
                axum::http::HeaderName::from_static(middleware::auth::USER_ID_HEADER),
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request logging and timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(config.request_timeout),
            ))
            .into_inner(),
    );

    Ok(app)
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs the tracing subscriber, builds the router and serves it until the
/// process is stopped.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> eyre::Result<()> {
/// let config = salon_api::config::ApiConfig::from_env()?;
/// let db_pool = salon_db::create_pool(&config.database_url).await?;
/// salon_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState::new(db_pool, config.timezone));
    let app = build_router(state, &config)?;

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{} (salon time zone {})", addr, config.timezone);
    axum::serve(listener, app).await?;

    Ok(())
}
