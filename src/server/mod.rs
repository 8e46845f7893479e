//! HTTP listeners.
//!
//! Two independent listeners share one store: the write listener accepts
//! text submissions and the read listener serves statistics.

pub mod handlers;
pub mod tokenizer;

pub use handlers::AppState;

use crate::error::ServerError;
use axum::routing::{get, post};
use axum::Router;
use futures::future;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

/// Router for the write listener: `POST /` with a text body.
pub fn write_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::submit_text))
        .with_state(state)
}

/// Router for the read listener: `GET /stats`.
pub fn read_router(state: AppState) -> Router {
    Router::new()
        .route("/stats", get(handlers::stats))
        .with_state(state)
}

/// A router bound to a TCP listener, ready to serve.
pub struct Endpoint {
    name: &'static str,
    listener: TcpListener,
    router: Router,
}

impl Endpoint {
    /// Bind `router` to `addr`. Port 0 picks a free port.
    pub async fn bind(name: &'static str, addr: &str, router: Router) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            name,
            listener,
            router,
        })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Serve requests until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting {} server on {}", self.name, self.local_addr()?);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        info!("{} server stopped", self.name);
        Ok(())
    }
}

/// Serve every endpoint until `shutdown` turns true.
///
/// In-flight requests get `grace` to finish once shutdown starts; after
/// that their connections are abandoned.
pub async fn serve_all(
    endpoints: Vec<Endpoint>,
    shutdown: watch::Receiver<bool>,
    grace: Duration,
) -> Result<(), ServerError> {
    let serving = future::try_join_all(
        endpoints
            .into_iter()
            .map(|endpoint| endpoint.run(wait_for_shutdown(shutdown.clone()))),
    );

    let deadline = async move {
        wait_for_shutdown(shutdown).await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = serving => {
            result?;
            info!("All listeners stopped");
        }
        _ = deadline => {
            warn!("Connections still open after {:?}, abandoning them", grace);
        }
    }

    Ok(())
}

/// Resolves once the shutdown flag is raised (or its sender is gone).
async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stopped| *stopped).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Aggregator, SharedStore, WordStore};
    use crate::models::Summary;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    /// Store that remembers what was written and always reports the same summary.
    #[derive(Default)]
    struct FakeStore {
        written: Mutex<Vec<String>>,
    }

    impl WordStore for FakeStore {
        fn write(&self, word: &str) {
            self.written.lock().push(word.to_string());
        }

        fn read(&self) -> Summary {
            fake_summary()
        }
    }

    fn fake_summary() -> Summary {
        Summary {
            count: 123,
            top_words: vec!["damian".to_string()],
            top_letters: vec!["d".to_string()],
        }
    }

    /// Bind `router` on an ephemeral port and serve it in the background.
    async fn spawn(router: Router) -> String {
        let endpoint = Endpoint::bind("test", "127.0.0.1:0", router).await.unwrap();
        let addr = endpoint.local_addr().unwrap();
        tokio::spawn(endpoint.run(std::future::pending()));
        format!("http://{}", addr)
    }

    fn state_with(store: SharedStore) -> AppState {
        AppState::new(store, 0)
    }

    #[tokio::test]
    async fn test_write_server_post_only() {
        let url = spawn(write_router(state_with(Arc::new(FakeStore::default())))).await;

        let res = reqwest::get(&url).await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_write_server_submit_text() {
        let store = Arc::new(FakeStore::default());
        let url = spawn(write_router(state_with(store.clone()))).await;

        let res = reqwest::Client::new()
            .post(&url)
            .header("content-type", "text/plain")
            .body("hello world 123")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert_eq!(*store.written.lock(), vec!["hello", "world", "123"]);
    }

    #[tokio::test]
    async fn test_write_server_rejects_oversized_body() {
        let store = Arc::new(FakeStore::default());
        let url = spawn(write_router(AppState::new(store.clone(), 8))).await;

        let res = reqwest::Client::new()
            .post(&url)
            .body("this body is longer than eight bytes")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_read_server_get_only() {
        let url = spawn(read_router(state_with(Arc::new(FakeStore::default())))).await;

        let res = reqwest::Client::new()
            .post(format!("{}/stats", url))
            .body("hello")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_read_server_get_stats() {
        let url = spawn(read_router(state_with(Arc::new(FakeStore::default())))).await;

        let res = reqwest::get(format!("{}/stats", url)).await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );

        let actual: Summary = res.json().await.unwrap();
        assert_eq!(actual, fake_summary());
    }

    #[tokio::test]
    async fn test_write_then_read_through_aggregator() {
        let store: SharedStore = Arc::new(Aggregator::new());
        let write_url = spawn(write_router(state_with(store.clone()))).await;
        let read_url = spawn(read_router(state_with(store))).await;

        let client = reqwest::Client::new();
        for body in ["Hello hello\nworld", "WORLD world aaab"] {
            let res = client.post(&write_url).body(body).send().await.unwrap();
            assert_eq!(res.status(), reqwest::StatusCode::OK);
        }

        let summary: Summary = reqwest::get(format!("{}/stats", read_url))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.top_words, vec!["world", "hello", "aaab"]);
        assert_eq!(summary.top_letters[0], "l");
    }

    #[tokio::test]
    async fn test_graceful_shutdown() {
        let router = read_router(state_with(Arc::new(FakeStore::default())));
        let endpoint = Endpoint::bind("test", "127.0.0.1:0", router).await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(endpoint.run(async move {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_serve_all_stops_when_idle() {
        let endpoint = Endpoint::bind("read", "127.0.0.1:0", Router::new()).await.unwrap();
        let (tx, rx) = watch::channel(false);

        let serving = tokio::spawn(serve_all(vec![endpoint], rx, Duration::from_secs(30)));
        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), serving)
            .await
            .expect("idle listeners should stop right away");
        assert!(result.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_serve_all_abandons_stalled_upload_after_grace() {
        let store = Arc::new(FakeStore::default());
        let endpoint = Endpoint::bind("write", "127.0.0.1:0", write_router(state_with(store)))
            .await
            .unwrap();
        let addr = endpoint.local_addr().unwrap();
        let (tx, rx) = watch::channel(false);

        let serving = tokio::spawn(serve_all(vec![endpoint], rx, Duration::from_millis(200)));

        // Announce a body that never finishes arriving.
        let mut client = TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"POST / HTTP/1.1\r\nhost: localhost\r\ncontent-length: 1000\r\n\r\nhello ")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), serving)
            .await
            .expect("shutdown should not wait on a stalled upload");
        assert!(result.unwrap().is_ok());
        drop(client);
    }

    #[tokio::test]
    async fn test_bind_conflict_reports_address() {
        let first = Endpoint::bind("a", "127.0.0.1:0", Router::new()).await.unwrap();
        let addr = first.local_addr().unwrap().to_string();

        let err = match Endpoint::bind("b", &addr, Router::new()).await {
            Ok(_) => panic!("second bind on {} should fail", addr),
            Err(e) => e,
        };
        assert!(matches!(err, ServerError::Bind { .. }));
        assert!(err.to_string().contains(&addr));
    }
}
