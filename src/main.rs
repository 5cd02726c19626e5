pub mod db;
pub mod features;
pub mod model;
pub mod server;
pub mod web;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tera::Tera;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::model::RiskModel;
use crate::server::config::ServerConfig;
use crate::web::AppState;

/// Pool size plus bounded overflow; requests beyond this wait for a free
/// connection instead of failing.
const MAX_POOL_CONNECTIONS: u32 = 15;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.log_dir);
    info!("starting metabolic-risk scoring server");

    // --- Database Pool Setup ---
    let mut opt = ConnectOptions::new(config.sql_url());
    opt.max_connections(MAX_POOL_CONNECTIONS);
    let db: DatabaseConnection = Database::connect(opt).await?;

    // --- Risk Model Setup ---
    // Loaded once; a missing artifact degrades scoring but never blocks
    // serving or persistence.
    let model = RiskModel::load(Path::new(&config.model_path)).map(Arc::new);
    if model.is_some() {
        info!(path = %config.model_path, "risk model loaded");
    }

    let templates = Arc::new(Tera::new("templates/**/*.html")?);

    let app_state = Arc::new(AppState {
        db,
        model,
        templates,
        config: config.clone(),
    });
    let app = web::create_axum_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
