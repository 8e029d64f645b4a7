//! bizdash - Small-business dashboard backend
//!
//! Binary entry point: wires configuration, the cache backend and the HTTP
//! server together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bizdash::cache::{KeyValueStore, MemoryStore, RedisStore};
use bizdash::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the bizdash server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the cache backend (Redis, or the in-memory store as fallback)
/// 4. Start the TTL cleanup task when running in memory
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizdash=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting bizdash server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, max_entries={}, cleanup_interval={}s, trend_window={}d",
        config.server_port, config.max_entries, config.cleanup_interval, config.trend_window_days
    );
    if config.uses_dev_secret() {
        warn!("JWT_SECRET is not set; using the development secret");
    }

    let (store, memory) = connect_store(&config).await;
    let state = AppState::new(store, &config);
    info!("Cache backend initialized: {}", state.cache.backend_name());

    let cleanup_handle = memory.map(|store| {
        info!("Background cleanup task started");
        spawn_cleanup_task(store, config.cleanup_interval)
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server terminated unexpectedly")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Picks the cache backend. Returns the memory store separately when it is
/// the one in use, since only it needs sweeping.
async fn connect_store(config: &Config) -> (Arc<dyn KeyValueStore>, Option<Arc<MemoryStore>>) {
    if let Some(url) = &config.redis_url {
        match RedisStore::connect(url).await {
            Ok(store) => {
                info!("Connected to Redis");
                let store: Arc<dyn KeyValueStore> = Arc::new(store);
                return (store, None);
            }
            Err(e) => warn!("Redis unavailable ({}); falling back to the in-memory store", e),
        }
    }

    let memory = Arc::new(MemoryStore::new(config.max_entries));
    let store: Arc<dyn KeyValueStore> = memory.clone();
    (store, Some(memory))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
