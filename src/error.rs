//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use tracing::{error, info};

use crate::constants::TIMEOUT_DETAIL;

/// Errors raised while building a comic.
#[derive(Debug)]
pub enum ComicError {
    /// The text or image service failed: network, auth, quota, bad request or unusable output.
    Upstream(String),
    /// The text service refused the structured JSON response mode.
    UnsupportedResponseFormat(String),
    /// The request ran past its time budget.
    Timeout,
    /// Startup configuration is unusable.
    Config(String),
}

impl std::fmt::Display for ComicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upstream(message) => write!(f, "{message}"),
            Self::UnsupportedResponseFormat(message) => {
                write!(f, "Structured response mode rejected: {message}")
            }
            Self::Timeout => write!(f, "{TIMEOUT_DETAIL}"),
            Self::Config(message) => write!(f, "Configuration error: {message}"),
        }
    }
}

impl std::error::Error for ComicError {}

impl From<reqwest::Error> for ComicError {
    fn from(err: reqwest::Error) -> Self {
        ComicError::Upstream(err.to_string())
    }
}

impl From<url::ParseError> for ComicError {
    fn from(err: url::ParseError) -> Self {
        ComicError::Config(err.to_string())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Human readable reason.
    pub detail: String,
}

impl IntoResponse for ComicError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ComicError::Timeout => {
                info!("Request timed out");
                StatusCode::REQUEST_TIMEOUT
            }
            ComicError::Upstream(_)
            | ComicError::UnsupportedResponseFormat(_)
            | ComicError::Config(_) => {
                error!("Comic generation failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorDetail {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
