//! Access query server.
//!
//! Provides an HTTP API for checking distributor access to locations and
//! for resolving ad-hoc rules against the loaded catalog.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use territory::catalog::load_reference;
use territory::config::Config;
use territory::Catalog;

mod routes;
use routes::AppState;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Distributor access query server")]
struct Args {
    /// TOML config with reference path and named distributors
    #[arg(short, long, default_value = "territory.toml")]
    config: PathBuf,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Territory Query Server");
    let config = Config::load_from_file(&args.config)?;
    info!(
        "Loaded config with {} distributor(s)",
        config.distributors.len()
    );

    let reference = config.global.reference.clone();
    let records = tokio::task::spawn_blocking(move || load_reference(reference)).await??;
    let catalog = Catalog::build(&records);

    let listen = args
        .listen
        .clone()
        .unwrap_or_else(|| config.global.listen.clone());

    let state = Arc::new(AppState {
        catalog,
        config,
        loaded_at: Utc::now(),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(routes::health_handler))
        .route(
            "/v1/check",
            get(routes::check_handler).post(routes::check_rule_handler),
        )
        .route("/v1/resolve", post(routes::resolve_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
