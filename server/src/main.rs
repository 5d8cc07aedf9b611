//! Sentinel Server
//!
//! Disk-usage monitoring and cleanup API with an Axum backend.

use axum::Router;
use clap::Parser;
use tracing::{info, instrument};

mod config;
mod routes;
mod state;

use config::Config;
use state::AppState;

/// Sentinel Server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to bind to
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    addr: String,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,
}

/// Build the application router
fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            ),
        )
        .layer(tower_http::compression::CompressionLayer::new())
        .layer(tower_http::cors::CorsLayer::permissive())
}

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sentinel=debug".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    info!(addr = %args.addr, data_path = %config.data_path, "Starting Sentinel server");

    let state = AppState::new(config).await?;
    {
        let servers = state.servers.read().await;
        state.log.write().await.info(format!(
            "Started disk space monitoring on {} servers.",
            servers.list().len()
        ));
    }

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    info!(addr = %args.addr, "Server listening");

    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}
