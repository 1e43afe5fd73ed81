use hub_server::{ServerError, build_router, logger};
use hub_ws::{AppState, ConnectionConfig, Hub, HubConfig, Metrics, ShutdownCoordinator};

use std::error::Error;

use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = hub_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = hub_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting hub-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Install the Prometheus recorder behind the metrics facade
    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::MetricsExporter {
            message: e.to_string(),
        })?;

    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();

    // Start the hub coordinator and its limiter ticker
    let hub = Hub::start(HubConfig::from(&config), metrics.clone(), &shutdown);

    let app_state = AppState {
        hub,
        metrics,
        shutdown: shutdown.clone(),
        config: ConnectionConfig::from(&config),
    };

    let app = build_router(app_state, prometheus);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Graceful shutdown complete");
        })
        .await?;

    Ok(())
}
