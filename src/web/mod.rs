//! HTTP surface: `POST /generate_comic`.

use std::num::NonZeroU16;
use std::time::Duration;

use axum::extract::State;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::comic::{ComicPipeline, ComicResult, ProductInfo};
use crate::error::ComicError;

mod cors;
mod middleware;

use middleware::{RequestTimeout, request_timeout};

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pipeline: ComicPipeline,
}

impl AppState {
    fn new(pipeline: ComicPipeline) -> Self {
        Self { pipeline }
    }
}

async fn generate_comic_handler(
    State(state): State<AppState>,
    Json(product): Json<ProductInfo>,
) -> Result<Json<ComicResult>, ComicError> {
    let comic = state.pipeline.generate(&product).await?;
    Ok(Json(comic))
}

/// Builds the application router.
///
/// Fails if an allowed origin is not a usable header value.
pub fn create_router(
    pipeline: ComicPipeline,
    timeout: Duration,
    allowed_origins: &[String],
) -> Result<Router, ComicError> {
    let router = Router::new()
        .route(
            "/generate_comic",
            axum::routing::post(generate_comic_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            RequestTimeout(timeout),
            request_timeout,
        ))
        .layer(cors::cors_layer(allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(pipeline));
    Ok(router)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Serves `app` until Ctrl-C.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    app: Router,
) -> Result<(), anyhow::Error> {
    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }
    Ok(())
}
