//! Request handlers for the write and read listeners.

use crate::analysis::SharedStore;
use crate::error::ServerError;
use crate::models::Summary;
use crate::server::tokenizer::WordSplitter;
use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use futures::StreamExt;
use tracing::debug;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    /// Maximum accepted body size in bytes; 0 means unlimited.
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(store: SharedStore, max_body_bytes: usize) -> Self {
        Self {
            store,
            max_body_bytes,
        }
    }
}

/// Record every whitespace-delimited word of the request body.
///
/// The body is consumed as it arrives; words completed before a size
/// violation stay recorded.
pub async fn submit_text(
    State(state): State<AppState>,
    body: Body,
) -> Result<StatusCode, ServerError> {
    let store = &state.store;
    let mut stream = body.into_data_stream();
    let mut splitter = WordSplitter::new();
    let mut received = 0usize;
    let mut words = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        received += chunk.len();

        if state.max_body_bytes > 0 && received > state.max_body_bytes {
            return Err(ServerError::BodyTooLarge {
                limit: state.max_body_bytes,
            });
        }

        words += splitter.push(&chunk, |word| store.write(word));
    }
    words += splitter.finish(|word| store.write(word));

    debug!("Recorded {} words ({} bytes)", words, received);
    Ok(StatusCode::OK)
}

/// Return the current statistics snapshot.
pub async fn stats(State(state): State<AppState>) -> Json<Summary> {
    Json(state.store.read())
}
