//! HTTP surface: route table, access policy and graceful shutdown.
//!
//! Life of a request:
//! 1. `TraceLayer` opens a span for the request.
//! 2. The route table picks a handler. Admin-only routes pass through
//!    [`require_admin`] first.
//! 3. The handler validates input and calls the record store.
//! 4. Success and failure are both rendered as a JSON envelope.
//!
//! Unknown `/api` paths always get a 404 envelope. Other paths go to the
//! static file directory when one is configured, and otherwise get the
//! same 404 envelope.

use std::path::Path;

use axum::{
    Router, middleware,
    routing::{any, delete, get, post, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::api::{self, applications, contacts, login, news, popup};
use crate::auth::require_admin;
use crate::state::AppState;

/// Build the full application router.
///
/// Public routes: login, application submission, news and popup reads,
/// contact submission. Everything else requires a bearer token.
#[must_use]
pub fn build_router(state: AppState, public_directory: Option<&Path>) -> Router {
    let public = Router::<AppState>::new()
        .route("/api/login", post(login::login))
        .route("/api/applications", post(applications::create))
        .route("/api/news", get(news::list))
        .route("/api/popup", get(popup::active))
        .route("/api/contacts", post(contacts::create))
        .route("/api", any(api::not_found))
        .route("/api/{*rest}", any(api::not_found));

    let protected = Router::<AppState>::new()
        .route("/api/applications", get(applications::list))
        .route("/api/applications/{id}", put(applications::update_status))
        .route("/api/applications/{id}", delete(applications::delete))
        .route("/api/news", post(news::create))
        .route("/api/news/{id}", delete(news::delete))
        .route("/api/popup", post(popup::publish))
        .route("/api/popup/{id}", delete(popup::retract))
        .route("/api/contacts", get(contacts::list))
        .route("/api/contacts/{id}", put(contacts::update_status))
        .route("/api/contacts/{id}", delete(contacts::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let router = public.merge(protected);
    let router = match public_directory {
        Some(directory) => router.fallback_service(ServeDir::new(directory)),
        None => router.fallback(api::not_found),
    };

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Resolve when the process receives Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl-C, shutting down"),
            Err(e) => {
                tracing::error!("failed to install Ctrl-C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
