use space_engineers_exporter::config::{Args, ExporterConfig};
use space_engineers_exporter::{exposition, logging, Collector, MetricSchema};

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use vrage_client::VRageClient;

const EXPORTER_NAME: &str = "space-engineers-exporter";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ExporterConfig::load(&args)?;

    let _logging_guard = logging::init_logging(
        config.log_dir(),
        EXPORTER_NAME,
        &config.log_level,
        config.log_format,
    )?;

    tracing::info!("Starting {} {}", EXPORTER_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("Remote API: {}", config.remote_api.url);

    let remote = &config.remote_api;
    let client = match VRageClient::new(
        &remote.url,
        remote.key_file.as_deref(),
        remote.key.as_deref(),
        remote.ssl_verify,
    ) {
        Ok(client) => client,
        Err(e) if e.is_fatal() => {
            tracing::error!("Invalid remote API credential: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Failed to create VRage client: {}", e);
            return Err(e.into());
        }
    };

    let schema = Arc::new(MetricSchema::default());
    tracing::debug!("Metric schema has {} series families", schema.descriptors().len());
    let collector = Arc::new(Collector::new(Arc::new(client), schema));
    let app = exposition::router(collector, &config.metrics_path);

    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    tracing::info!(
        "Serving metrics on http://{}{}",
        listener.local_addr()?,
        config.metrics_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP listener stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
