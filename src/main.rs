//! bluegreen: a blue-green deployment status service.
//!
//! This is the application entry point. It resolves configuration, initializes
//! tracing, opens the database connection, sets up the Axum router and starts
//! the HTTP server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bluegreen::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use bluegreen::db::{DatabaseProbe, DisconnectedDatabase, PgDatabase};
use bluegreen::host::HostInfo;
use bluegreen::http::{listen_for_termination, start_server, terminated};
use bluegreen::routes::create_router;
use bluegreen::state::AppState;
use bluegreen::templates::init_templates;

/// bluegreen: shows which side of a blue-green deployment is serving traffic
#[derive(Parser, Debug)]
#[command(name = "bluegreen", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "bluegreen=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_level: Option<String>, logging: &LoggingConfig) {
    // Priority: CLI > env > default
    let log_filter = log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env(),
    };

    init_tracing(args.log_level, &config.logging);

    tracing::info!(
        name = %config.deployment.name,
        version = %config.deployment.version,
        color = %config.deployment.color,
        config_file = args.config.as_deref().unwrap_or("(defaults)"),
        "Loaded configuration"
    );

    let tera = init_templates()?;
    tracing::info!("Initialized templates");

    let host = HostInfo::detect();

    let termination = listen_for_termination();

    // The connect can take up to the connect timeout; a signal meanwhile exits cleanly
    let connected = tokio::select! {
        result = PgDatabase::connect(&config.database) => Some(result),
        _ = terminated(termination.clone()) => None,
    };
    let Some(connected) = connected else {
        tracing::info!("Terminated during startup");
        return Ok(());
    };

    let db: Arc<dyn DatabaseProbe> = match connected {
        Ok(db) => Arc::new(db),
        Err(e) if config.database.required => {
            tracing::error!(error = %e, "Database connection required but unavailable");
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!(error = %e, "Error connecting to database, continuing without it");
            Arc::new(DisconnectedDatabase::new(e.to_string()))
        }
    };

    let state = AppState::new(config, tera, host, db);
    let app = create_router(state.clone());

    start_server(app, &state, termination).await?;

    Ok(())
}
