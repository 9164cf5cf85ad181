//! Application state and router builder.
//!
//! # Route Map
//!
//! ```text
//! /
//! ├── GET  /                    # Landing page (drains flash)
//! ├── GET  /about               # Static page
//! ├── GET  /news                # Static page
//! ├── GET  /health              # Health check
//! ├── POST /users               # Registration
//! ├── POST /signin              # Sign in
//! ├── POST /signout             # Sign out
//! └── /tasks/                   # Session-authenticated
//!     ├── GET    /              # List own tasks (drains flash)
//!     ├── POST   /              # Create task
//!     ├── GET    /:id           # Show own task
//!     ├── PUT    /:id           # Update own task
//!     └── DELETE /:id           # Delete own task
//! ```
//!
//! Middleware, innermost first: trace, compression, CORS, security headers,
//! sessions.

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tower_sessions::{Expiry, SessionManagerLayer};
use tracing::Level;

use tasknest_shared::auth::session::SessionHandle;
use tasknest_shared::models::user::User;
use tasknest_shared::store::postgres::PgStore;
use tasknest_shared::store::UserStore;

use crate::error::ApiError;
use crate::session::CookieSession;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; the pool and config are
/// both cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Store over the shared pool
    pub fn store(&self) -> PgStore {
        PgStore::new(self.db.clone())
    }
}

/// The signed-in user, injected by the session auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::pages::home))
        .route("/about", get(routes::pages::about))
        .route("/news", get(routes::pages::news))
        .route("/health", get(routes::health::health_check))
        .route("/users", post(routes::users::register))
        .route("/signin", post(routes::auth::sign_in))
        .route("/signout", post(routes::auth::sign_out));

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list).post(routes::tasks::create))
        .route(
            "/:id",
            get(routes::tasks::show)
                .put(routes::tasks::update)
                .delete(routes::tasks::destroy),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
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
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let session_layer = SessionManagerLayer::new(tower_sessions::MemoryStore::default())
        .with_name(state.config.session.cookie_name.clone())
        .with_secure(state.config.api.production)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            state.config.session.inactivity_minutes,
        )));

    Router::new()
        .merge(public_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .layer(session_layer)
        .with_state(state)
}

/// Session authentication middleware.
///
/// Resolves the signed-in user id from the cookie session, loads the user,
/// and injects it as a request extension. Requests without a live session
/// get 401; a session pointing at a deleted user is treated the same.
async fn session_auth_layer(
    State(state): State<AppState>,
    session: tower_sessions::Session,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let handle = CookieSession::new(session);

    let user_id = handle
        .current_user()
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Sign in required".to_string()))?;

    let user = state
        .store()
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Sign in required".to_string()))?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
