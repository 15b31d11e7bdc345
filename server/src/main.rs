#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code to prevent panics from corrupt data.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use clubhouse::{
    AppState,
    auth::{AdminAllowList, TokenAuthority},
    build_router,
    config::ServerConfig,
    server::shutdown_signal,
    store,
    time::{SystemTimeSource, TimeSource},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubhouse=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: store={:?}, listen_port={}, admins={}",
        config.store,
        config.listen_port,
        config.admin_credentials.len()
    );

    let clock: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);

    // A store that cannot be opened at startup is fatal.
    let store = match store::open(&config.store, Arc::clone(&clock)) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open record store: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Record store ready: {}", store.backend_name());

    let credentials = match AdminAllowList::new(config.admin_credentials.clone()) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("Invalid admin credentials: {e}");
            std::process::exit(1);
        }
    };

    let tokens = match TokenAuthority::new(config.jwt_secret.as_bytes(), Arc::clone(&clock)) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!("Failed to create token authority: {e}");
            std::process::exit(1);
        }
    };

    let state = AppState {
        store,
        tokens: Arc::new(tokens),
        credentials: Arc::new(credentials),
        clock,
    };

    if let Some(directory) = &config.public_directory {
        tracing::info!("Serving static files from {}", directory.display());
    }
    let app = build_router(state.clone(), config.public_directory.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    let backend = state.store.backend_name();
    drop(state);
    tracing::info!("Server stopped, {backend} store closed");
}
