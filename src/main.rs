mod auth;
mod config;
mod error;
mod extractors;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Ensure data and uploads directories exist
    std::fs::create_dir_all(config.data_path())?;
    std::fs::create_dir_all(config.uploads_path())?;

    // Build app state
    let state = AppState::new(config.clone());

    // Build router
    let app = Router::new()
        .route("/", get(routes::home::index))
        .route("/post/{slug}", get(routes::posts::detail))
        .route("/new", get(routes::posts::new_page).post(routes::posts::create))
        .route(
            "/edit/{slug}",
            get(routes::posts::edit_page).post(routes::posts::update),
        )
        .route("/delete/{slug}", post(routes::posts::remove))
        .route("/uploads/{file}", get(routes::uploads::serve))
        .route("/assets/{*path}", get(routes::assets::serve))
        .merge(routes::auth::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
