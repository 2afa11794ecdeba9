//! Test helpers: loopback servers and polling

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

const WAIT_ATTEMPTS: usize = 50;
const WAIT_DELAY: Duration = Duration::from_millis(50);

/// Router served on an ephemeral loopback port
pub struct Server {
    pub addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Server {
    /// Graceful stop: waits for in-flight requests and drops the router
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}

/// Serve `router` on 127.0.0.1 with an OS-assigned port
pub async fn serve(router: Router) -> Server {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind loopback listener");
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    Server {
        addr,
        shutdown_tx,
        handle,
    }
}

/// Loopback address with nothing listening on it
pub async fn unused_addr() -> SocketAddr {
    TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap()
}

/// Poll `check` until it yields a value or the attempts run out
pub async fn poll_until<T, F, Fut>(mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for _ in 0..WAIT_ATTEMPTS {
        if let Some(value) = check().await {
            return Some(value);
        }
        tokio::time::sleep(WAIT_DELAY).await;
    }
    None
}

/// How the mock mirror answers
#[derive(Clone, Copy)]
pub enum MirrorBehavior {
    Accept,
    Fail,
    Stall(Duration),
}

/// Body as seen by the mock mirror
#[derive(Clone, Debug)]
pub struct ReceivedBody {
    pub body: Bytes,
    pub content_type: Option<String>,
}

#[derive(Clone)]
struct MirrorState {
    behavior: MirrorBehavior,
    received: Arc<Mutex<Vec<ReceivedBody>>>,
}

pub struct MockMirror {
    server: Server,
    received: Arc<Mutex<Vec<ReceivedBody>>>,
}

impl MockMirror {
    pub fn url(&self) -> String {
        format!("http://{}/mirror", self.server.addr)
    }

    pub async fn received(&self) -> Vec<ReceivedBody> {
        self.received.lock().await.clone()
    }

    pub async fn stop(self) {
        self.server.stop().await;
    }
}

pub async fn spawn_mock_mirror(behavior: MirrorBehavior) -> MockMirror {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = MirrorState {
        behavior,
        received: received.clone(),
    };
    let router = Router::new()
        .route("/mirror", post(accept_body))
        .with_state(state);

    MockMirror {
        server: serve(router).await,
        received,
    }
}

async fn accept_body(
    State(state): State<MirrorState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .received
        .lock()
        .await
        .push(ReceivedBody { body, content_type });

    match state.behavior {
        MirrorBehavior::Accept => StatusCode::OK,
        MirrorBehavior::Fail => StatusCode::INTERNAL_SERVER_ERROR,
        MirrorBehavior::Stall(delay) => {
            tokio::time::sleep(delay).await;
            StatusCode::OK
        }
    }
}
