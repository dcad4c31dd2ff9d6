//! CRM statistics HTTP server binary.
//!
//! Loads configuration, builds the record store and provider registry, and
//! serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository and built-in defaults
//! cargo run --bin crm-statistics-server
//!
//! # Run with an explicit configuration file
//! STATISTICS_CONFIG=statistics.toml cargo run --bin crm-statistics-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: `[server].host`, else 0.0.0.0)
//! - `PORT`: Server port (default: `[server].port`, else 8080)
//! - `STATISTICS_CONFIG`: Configuration file path
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crm_statistics::config::AppConfig;
use crm_statistics::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting CRM statistics server");

    let config = AppConfig::load()?;
    let state = AppState::from_config(&config)?;
    info!(
        "Registered statistics: {}",
        state.registry.keys().join(", ")
    );

    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
