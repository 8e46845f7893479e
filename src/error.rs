//! Error types for the HTTP listeners.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to resolve local address: {0}")]
    LocalAddr(#[source] std::io::Error),
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
    #[error("Failed to read request body: {0}")]
    Body(#[from] axum::Error),
    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}

impl ServerError {
    /// HTTP status reported to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Body(_) => StatusCode::BAD_REQUEST,
            ServerError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Rejecting request ({}): {}", status, self);
        (status, self.to_string()).into_response()
    }
}
