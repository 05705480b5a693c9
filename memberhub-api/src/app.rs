//! Application state and router builder
//!
//! Defines the shared application state and builds the Axum router with all
//! routes and middleware.
//!
//! # Example
//!
//! ```no_run
//! use memberhub_api::{app::{build_router, AppState}, config::Config};
//! use sqlx::PgPool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = PgPool::connect(&config.database.url).await?;
//! let state = AppState::new(pool, config);
//! let app = build_router(state);
//! # Ok(())
//! # }
//! ```

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use memberhub_shared::repository::{MemberRepository, MembershipRepository, PgStore};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The
/// repositories are trait objects so tests can run the router against an
/// in-memory store.
#[derive(Clone)]
pub struct AppState {
    /// Member persistence
    pub members: Arc<dyn MemberRepository>,

    /// Membership persistence
    pub memberships: Arc<dyn MembershipRepository>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state backed by PostgreSQL
    pub fn new(db: PgPool, config: Config) -> Self {
        Self::with_store(Arc::new(PgStore::new(db)), config)
    }

    /// Creates state over any store implementing both repositories
    pub fn with_store<S>(store: Arc<S>, config: Config) -> Self
    where
        S: MemberRepository + MembershipRepository + 'static,
    {
        Self {
            members: store.clone(),
            memberships: store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                     # Health check
/// └── /api/
///     ├── /member/
///     │   ├── POST   /            # Create member
///     │   ├── GET    /            # List members
///     │   ├── GET    /:id         # Get member
///     │   ├── PUT    /:id         # Update member
///     │   └── DELETE /:id         # Delete member
///     └── /membership/
///         ├── GET    /            # List memberships
///         ├── POST   /:memberId   # Create membership
///         ├── GET    /:id         # Get membership
///         ├── PUT    /:id         # Update membership
///         └── DELETE /:id         # Delete membership
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let member_routes = Router::new()
        .route(
            "/",
            post(routes::members::add_member).get(routes::members::list_members),
        )
        .route(
            "/:id",
            get(routes::members::get_member)
                .put(routes::members::update_member)
                .delete(routes::members::delete_member),
        );

    let membership_routes = Router::new()
        .route("/", get(routes::memberships::list_memberships))
        .route(
            "/:id",
            post(routes::memberships::add_membership)
                .get(routes::memberships::get_membership)
                .put(routes::memberships::update_membership)
                .delete(routes::memberships::delete_membership),
        );

    let api_routes = Router::new()
        .nest("/member", member_routes)
        .nest("/membership", membership_routes);

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
