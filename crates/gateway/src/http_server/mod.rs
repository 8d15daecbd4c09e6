use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE};
use http::{HeaderValue, Method};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod handlers;

use crate::config::Config;
use crate::GatewayState;

/// Maximum archive size in bytes (100 MiB)
pub const MAX_ARCHIVE_SIZE_BYTES: usize = 100 * 1024 * 1024;

/// Allowance on top of the archive limit for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the public router: service info, upload and download routes.
///
/// Every response carries permissive CORS headers and any `OPTIONS`
/// request is answered directly with an empty 200.
pub fn router(state: GatewayState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(vec![CONTENT_TYPE])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(api::info::handler))
        .route("/upload", post(api::upload::handler))
        .route("/t/", get(api::download::missing_id_handler))
        .route("/t/:id", get(api::download::handler))
        .route("/t/:id/", get(api::download::handler))
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(
            MAX_ARCHIVE_SIZE_BYTES + MULTIPART_OVERHEAD_BYTES,
        ))
        .with_state(state)
        // CorsLayer only sends these on preflight responses
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(cors_layer)
}

/// Run the gateway HTTP server until the shutdown channel fires.
pub async fn run(
    config: Config,
    state: GatewayState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = config.listen_addr;
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(state).layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "Gateway server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
