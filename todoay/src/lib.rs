//! # todoay: Multi-User Todo Tracking Backend
//!
//! `todoay` is a multi-user todo tracking service. Each account owns its own
//! todos, categories, and hashtags; ownership is enforced on every read and
//! write, so one user can never see or touch another user's data.
//!
//! ## Overview
//!
//! The service tracks two flavors of todo. **Daily todos** are pinned to a
//! calendar day and can carry a target time, an alarm time, a place, and the
//! people involved. **Due-date todos** are tracked by deadline and carry an
//! importance level (LOW, MEDIUM, HIGH); they can be listed sorted by due
//! date or by importance. Both flavors can be filed under a user-defined
//! category and tagged with hashtags, which are normalized and shared across
//! todos.
//!
//! Authentication is stateless: a login issues a short-lived access token and
//! a long-lived refresh token, both JWTs signed with the server's secret key.
//! Every protected request presents the access token as a bearer credential,
//! from which the handler resolves the calling user. Passwords are stored as
//! argon2 hashes.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for persistence.
//!
//! The **API layer** ([`api`]) exposes public authentication routes
//! (`/auth/*`, `/profile/{nickname}`) and the protected resource routes under
//! `/api/v1/*`. The **authentication layer** ([`auth`]) covers password
//! hashing, token issuing/verification, bearer-token identity resolution, and
//! the ownership guard handlers use before touching a resource. The
//! **database layer** ([`db`]) uses the repository pattern: each entity has a
//! repository that owns its queries, and handlers compose repositories inside
//! a transaction per mutation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use todoay::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = todoay::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     todoay::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use axum::{
    Router, http,
    http::HeaderValue,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{CategoryId, HashtagId, TodoId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the todoay database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect the main pool and run migrations
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool_settings = &config.database.pool;
    let mut options = PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .min_connections(pool_settings.min_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.acquire_timeout_secs));

    if pool_settings.idle_timeout_secs > 0 {
        options = options.idle_timeout(Duration::from_secs(pool_settings.idle_timeout_secs));
    }
    if pool_settings.max_lifetime_secs > 0 {
        options = options.max_lifetime(Duration::from_secs(pool_settings.max_lifetime_secs));
    }

    let pool = options.connect(&config.database.url).await?;

    info!("Running database migrations");
    migrator().run(&pool).await?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.auth.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.auth.cors.allow_credentials)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
        ])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE]);

    if let Some(max_age) = config.auth.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// Public routes (signup, login, profile lookup, docs) take no credentials;
/// every route under `/api/v1` resolves the caller from its bearer token and
/// rejects the request with 401 when that fails.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{auth, categories, daily_todos, due_date_todos, profile};

    let router = Router::new()
        // Public surface
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/profile/{nickname}", get(profile::read_profile))
        // Protected resources
        .route(
            "/api/v1/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/v1/categories/{id}",
            axum::routing::put(categories::modify_category).delete(categories::delete_category),
        )
        .route(
            "/api/v1/daily-todos",
            get(daily_todos::list_daily_todos).post(daily_todos::create_daily_todo),
        )
        .route(
            "/api/v1/daily-todos/{id}",
            get(daily_todos::read_daily_todo)
                .put(daily_todos::modify_daily_todo)
                .delete(daily_todos::delete_daily_todo),
        )
        .route(
            "/api/v1/due-date-todos",
            get(due_date_todos::list_due_date_todos).post(due_date_todos::create_due_date_todo),
        )
        .route(
            "/api/v1/due-date-todos/{id}",
            get(due_date_todos::read_due_date_todo)
                .put(due_date_todos::modify_due_date_todo)
                .delete(due_date_todos::delete_due_date_todo),
        )
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled application: configuration, database pool, and router.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting todoay with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("todoay listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
