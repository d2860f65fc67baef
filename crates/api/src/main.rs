//! API server entry point.

use std::sync::Arc;

use api::config::{Config, StoreBackend};
use api::routes::products::AppState;
use catalog::CatalogCoordinator;
use store::{AwsStoreConfig, DynamoRecordStore, S3ObjectStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve(app: axum::Router, config: &Config) {
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Wire stores and start serving
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory stores");
            let (state, _objects, _records) = api::create_memory_state(&config.images_bucket);
            let app = api::create_app(state, metrics_handle, config.request_timeout);
            serve(app, &config).await;
        }
        StoreBackend::Aws => {
            let aws_config = AwsStoreConfig {
                region: config.region.clone(),
                endpoint_url: config.endpoint_url.clone(),
            };
            tracing::info!(
                bucket = %config.images_bucket,
                table = %config.products_table,
                "using AWS-backed stores"
            );
            let objects = S3ObjectStore::connect(&config.images_bucket, &aws_config).await;
            let records = DynamoRecordStore::connect(&config.products_table, &aws_config).await;
            let state = Arc::new(AppState {
                coordinator: CatalogCoordinator::new(objects, records),
            });
            let app = api::create_app(state, metrics_handle, config.request_timeout);
            serve(app, &config).await;
        }
    }
}
