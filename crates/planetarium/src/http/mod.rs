//! HTTP boundary for planetarium.
//!
//! Translates requests into catalog and image store calls and maps errors onto
//! status codes. Responses are JSON, except for uploads which redirect to the
//! planet view.

mod error;
mod handlers;
mod params;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::images::ImageStore;
use crate::logging;

pub use error::{status_for, ApiError};
pub use handlers::UPLOAD_ACTION;
pub use params::{parse_id, required_id, RequestArgs};

/// Room left in the request body limit for multipart framing and the `id` field.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The loaded catalog.
    pub catalog: Arc<Catalog>,
    /// The image store.
    pub images: Arc<ImageStore>,
    /// Largest accepted image, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Bundle the services for the router.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, images: Arc<ImageStore>, max_upload_bytes: usize) -> Self {
        Self {
            catalog,
            images,
            max_upload_bytes,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/planete", get(handlers::show_planet))
        .route("/planete/edit", get(handlers::edit_planet))
        .route(UPLOAD_ACTION, post(handlers::upload_image))
        .route("/satellite", get(handlers::show_satellite))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(logging::request_span::<axum::body::Body>)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Serve the application until Ctrl-C is received.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
