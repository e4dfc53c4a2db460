//! Pandan Stand Counter - single-counter ordering service.
//!
//! One binary serves both views behind the stall's QR code: the customer
//! ordering flow and the staff board (selected client-side via
//! `?mode=staff`).
//!
//! # Architecture
//!
//! - Axum JSON API consumed by both views
//! - Injected order store (JSON file document, or in-memory when no data
//!   file is configured)
//! - Lifecycle controller with a background expiry sweep cancelling unpaid
//!   orders after the payment window
//! - Snapshot subscription surfaced over SSE for live board updates

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pandan_stand_core::Catalog;
use pandan_stand_counter::config::CounterConfig;
use pandan_stand_counter::lifecycle::Sweeper;
use pandan_stand_counter::routes;
use pandan_stand_counter::state::AppState;
use pandan_stand_counter::store::{JsonFileBackend, MemoryBackend, OrderBackend, OrderStore};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = CounterConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pandan_stand_counter=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Open the order store over the configured backend
    let backend: Box<dyn OrderBackend> = match &config.data_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "using JSON file store");
            Box::new(JsonFileBackend::new(path.clone()))
        }
        None => {
            tracing::warn!("no COUNTER_DATA_FILE set, orders reset on restart");
            Box::new(MemoryBackend::default())
        }
    };
    let store = Arc::new(OrderStore::open(backend, config.payment_window));

    // Start the expiry sweep
    let sweeper = Sweeper::spawn(Arc::clone(&store), config.sweep_interval);
    tracing::info!(
        every_secs = config.sweep_interval.as_secs(),
        "expiry sweep started"
    );

    // Build application state
    let state = AppState::new(config.clone(), Catalog::stall_default(), store);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("counter listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Stop the sweep before exiting so the timer never outlives the views
    sweeper.stop();
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
