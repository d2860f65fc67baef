//! HTTP API server for the product catalog.
//!
//! Exposes the three coordinator operations (create, list, delete) with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, post};
use catalog::CatalogCoordinator;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{InMemoryObjectStore, InMemoryRecordStore, ObjectStore, RecordStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use routes::products::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<O, R>(
    state: Arc<AppState<O, R>>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router
where
    O: ObjectStore + 'static,
    R: RecordStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", post(routes::products::create::<O, R>))
        .route("/products", get(routes::products::list::<O, R>))
        .route("/products/{id}", delete(routes::products::delete::<O, R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}

/// Creates application state backed by in-memory stores.
///
/// Returns the store handles alongside the state so tests can inspect
/// them and inject failures.
pub fn create_memory_state(
    images_bucket: &str,
) -> (
    Arc<AppState<InMemoryObjectStore, InMemoryRecordStore>>,
    InMemoryObjectStore,
    InMemoryRecordStore,
) {
    let objects = InMemoryObjectStore::new(images_bucket);
    let records = InMemoryRecordStore::new();

    let state = Arc::new(AppState {
        coordinator: CatalogCoordinator::new(objects.clone(), records.clone()),
    });

    (state, objects, records)
}
