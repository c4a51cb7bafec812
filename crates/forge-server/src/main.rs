//! FORGE Server
//!
//! Serves member system profiles, hangar inventories and fleet views over
//! HTTP. Uses SQLite (embedded) as the record store and Redis or an
//! in-process map as the cache.

use anyhow::{Context, Result};
use forge_server::config::{LogFormat, ServerConfig};
use forge_server::services::DataAccess;
use forge_server::storage::Backends;
use forge_server::{router, AppState};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting FORGE Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the configured level when set
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!(e))
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        "Config loaded: bind={}, db={}, cache_ttl={}s",
        config.bind_address, config.database_path, config.cache_ttl_secs
    );

    let backends = Backends::connect(&config)
        .await
        .context("Failed to initialize storage")?;
    info!("Storage initialized");

    let data = DataAccess::from_backends(&backends, config.cache_ttl());
    let app = router(AppState::new(data));

    let addr: SocketAddr = match config.bind_address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            backends.close().await;
            return Err(e).context("Failed to parse bind address");
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            backends.close().await;
            return Err(e).context("Failed to bind to address");
        }
    };
    info!("Server listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    backends.close().await;
    served.context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
