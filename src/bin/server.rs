//! # Catalog Server Binary Entry Point
//!
//! Thin wrapper that seeds the image catalog and serves it over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin server
//! cargo run --bin server -- --config config/server.toml
//! cargo run --bin server -- --address 0.0.0.0:8000
//! ```
//!
//! The server will:
//! 1. Load configuration (defaults if no file is given)
//! 2. Generate the 50 sample images
//! 3. Serve the catalog API and the `/ws` subscription endpoint until Ctrl-C

use clap::Parser;
use env_logger::Builder;
use log::{info, LevelFilter};
use std::io::Write;
use std::sync::Arc;

use image_catalog::common::config::ServerConfig;
use image_catalog::server::{create_app, AppState};

/// Command-line arguments for the server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the server configuration file (TOML format)
    ///
    /// Example: config/server.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address, overrides the configuration file
    #[arg(short, long)]
    address: Option<String>,
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// INFO level by default, `RUST_LOG` takes precedence.
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(address) = args.address {
        config.server.address = address;
    }

    info!("🚀 Initializing image catalog...");
    let state = Arc::new(AppState::new());
    let app = create_app(state);

    let addr = config.server.address;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 Image catalog running on http://{}", addr);
    info!("📡 Subscriptions: ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
