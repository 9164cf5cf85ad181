//! # TaskNest API Server
//!
//! HTTP server for TaskNest: registration, cookie-session sign-in, and
//! per-user task management.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasknest-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasknest_api::app::{build_router, AppState};
use tasknest_api::config::Config;
use tasknest_shared::db::migrations::run_migrations;
use tasknest_shared::db::pool::{create_pool, DatabaseConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasknest_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskNest API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
