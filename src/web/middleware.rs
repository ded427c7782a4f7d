use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ComicError;

/// Wall-clock budget for one request.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RequestTimeout(pub(crate) Duration);

/// Answers 408 once the inner handler runs past the budget.
///
/// Only the wait is abandoned; a remote call already sent may still complete
/// on the provider's side.
pub(crate) async fn request_timeout(
    State(RequestTimeout(budget)): State<RequestTimeout>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(budget, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!("{} exceeded the {:?} request timeout", path, budget);
            ComicError::Timeout.into_response()
        }
    }
}
