//! # geofeed
//!
//! Geofeed server binary — wires together the log follower, the GeoIP
//! resolver, the event bus, and the HTTP/WebSocket server, then owns the
//! process lifetime: wait for an interrupt, stop the follower, close every
//! subscriber queue, and drain both long-lived tasks before exiting.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use geofeed_core::EventBus;
use geofeed_geoip::{LocationResolver, MaxMindResolver};
use geofeed_ingest::{IngestPipeline, LineFollower};
use geofeed_server::shutdown::DEFAULT_SHUTDOWN_TIMEOUT;
use geofeed_server::{GeofeedServer, ServerConfig};
use geofeed_settings::GeofeedSettings;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Geofeed server.
#[derive(Parser, Debug)]
#[command(name = "geofeed", about = "Stream log-derived geolocations to web viewers")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings; 0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Path of the log file to follow (overrides settings).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Path to the MaxMind City database (overrides settings).
    #[arg(long)]
    geoip_db: Option<PathBuf>,

    /// Load settings from this file instead of `~/.geofeed/settings.json`.
    #[arg(long)]
    settings: Option<PathBuf>,
}

impl Cli {
    /// The log file to follow, CLI flag first, then settings. The server
    /// has no function without one.
    fn resolve_log_file(&self, settings: &GeofeedSettings) -> Result<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| {
                (!settings.ingest.log_file.is_empty())
                    .then(|| PathBuf::from(&settings.ingest.log_file))
            })
            .context("a log file is required (--log-file or GEOFEED_LOG_FILE)")
    }

    fn resolve_geoip_db(&self, settings: &GeofeedSettings) -> PathBuf {
        self.geoip_db
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.geoip.database_path))
    }

    fn resolve_server_config(&self, settings: &GeofeedSettings) -> ServerConfig {
        ServerConfig {
            host: self
                .host
                .clone()
                .unwrap_or_else(|| settings.server.host.clone()),
            port: self.port.unwrap_or(settings.server.port),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings = match args.settings {
        Some(ref path) => geofeed_settings::load_settings_from_path(path)
            .context("failed to load settings")?,
        None => geofeed_settings::load_settings().unwrap_or_default(),
    };
    geofeed_core::logging::init_subscriber(&settings.logging.level);

    let log_file = args.resolve_log_file(&settings)?;
    let geoip_db = args.resolve_geoip_db(&settings);
    let config = args.resolve_server_config(&settings);

    // Startup collaborators are fatal when absent: the core has no
    // function without them.
    let resolver = MaxMindResolver::open(&geoip_db).context("failed to open GeoIP database")?;
    info!(path = %geoip_db.display(), "GeoIP database loaded");

    let stop = CancellationToken::new();
    let follower = LineFollower::open(
        &log_file,
        Duration::from_millis(settings.ingest.poll_interval_ms),
        stop.clone(),
    )
    .await
    .context("failed to open log file")?;
    info!(path = %log_file.display(), "following log file");

    let bus = Arc::new(EventBus::new());
    let pipeline = IngestPipeline::new(
        follower,
        Arc::new(resolver) as Arc<dyn LocationResolver>,
        Arc::clone(&bus),
    );
    let pipeline_task = tokio::spawn(pipeline.run());

    let metrics_handle = geofeed_server::metrics::install_recorder();
    let server = GeofeedServer::new(config, Arc::clone(&bus)).with_metrics(metrics_handle);
    let (addr, server_task) = server.listen().await.context("failed to bind server")?;
    info!(%addr, "geofeed listening");

    shutdown_signal().await?;
    info!("interrupt received, shutting down");

    // Stop the follower so the pipeline's line sequence ends, end every
    // client writer loop, then stop the listener and drain both tasks.
    stop.cancel();
    bus.close_all();
    server
        .shutdown()
        .graceful_shutdown(vec![pipeline_task, server_task], DEFAULT_SHUTDOWN_TIMEOUT)
        .await;

    info!("shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .context("failed to install SIGTERM handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for interrupt")?;
            }
            _ = terminate.recv() => {}
        }
        Ok(())
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for interrupt")
    }
}
