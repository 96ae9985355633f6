//! Optional HTTP remote control.
//!
//! The server runs on its own thread with its own tokio runtime; commands
//! cross into the UI thread over an unbounded channel and are drained once
//! per frame by [`drain_remote_commands`]. Responses travel back through
//! oneshot channels so a wedged UI thread surfaces as a timeout, not a hang.

use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener},
    thread,
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use engine::media::{AudioElement, VideoElement};
use tokio::sync::{mpsc, oneshot};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, EventRequest, RemoteManifest, ViewerSnapshot};
use crate::controller::PlaybackController;

#[derive(Debug)]
pub enum RemoteCmd {
    GetState {
        respond: oneshot::Sender<ViewerSnapshot>,
    },
    Apply {
        action_id: String,
        respond: oneshot::Sender<Result<ViewerSnapshot, String>>,
    },
}

#[derive(Clone)]
struct RemoteState {
    tx: mpsc::UnboundedSender<RemoteCmd>,
}

async fn health() -> &'static str {
    "ok"
}

async fn manifest() -> Json<RemoteManifest> {
    Json(api::manifest())
}

async fn send_cmd<T>(
    tx: &mpsc::UnboundedSender<RemoteCmd>,
    cmd: RemoteCmd,
    rx: oneshot::Receiver<T>,
) -> Result<T, (StatusCode, String)> {
    tx.send(cmd).map_err(|_| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "viewer command channel closed".to_string(),
        )
    })?;

    match tokio::time::timeout(Duration::from_secs(2), rx).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(_)) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "viewer did not respond".to_string(),
        )),
        Err(_) => Err((StatusCode::GATEWAY_TIMEOUT, "viewer timed out".to_string())),
    }
}

async fn viewer_state(
    State(state): State<RemoteState>,
) -> Result<Json<ViewerSnapshot>, (StatusCode, String)> {
    let (tx, rx) = oneshot::channel();
    let snapshot = send_cmd(&state.tx, RemoteCmd::GetState { respond: tx }, rx).await?;
    Ok(Json(snapshot))
}

async fn viewer_event(
    State(state): State<RemoteState>,
    Json(payload): Json<EventRequest>,
) -> Result<Json<ViewerSnapshot>, (StatusCode, String)> {
    let (tx, rx) = oneshot::channel();
    let res = send_cmd(
        &state.tx,
        RemoteCmd::Apply {
            action_id: payload.action_id,
            respond: tx,
        },
        rx,
    )
    .await?;

    match res {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(msg) => Err((StatusCode::BAD_REQUEST, msg)),
    }
}

pub fn router(tx: mpsc::UnboundedSender<RemoteCmd>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/manifest", get(manifest))
        .route("/api/viewer/state", get(viewer_state))
        .route("/api/viewer/event", post(viewer_event))
        .with_state(RemoteState { tx })
        .layer(cors)
}

#[derive(Debug, Clone, Copy)]
pub struct RemoteServerInfo {
    pub addr: SocketAddr,
}

pub struct RemoteServer {
    pub rx: mpsc::UnboundedReceiver<RemoteCmd>,
    shutdown: Option<oneshot::Sender<()>>,
    pub info: RemoteServerInfo,
}

impl RemoteServer {
    /// Binds `127.0.0.1:port` (`0` picks a free port) and serves until
    /// shutdown or drop.
    pub fn start(port: u16) -> io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel::<RemoteCmd>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);

        // Bind synchronously so we can fail fast if the port is unavailable.
        let std_listener = TcpListener::bind(addr)?;
        std_listener.set_nonblocking(true)?;
        let info = RemoteServerInfo {
            addr: std_listener.local_addr()?,
        };

        thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(err) => {
                    eprintln!("remote control runtime failed to start: {err}");
                    return;
                }
            };
            rt.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(std_listener) {
                    Ok(listener) => listener,
                    Err(err) => {
                        eprintln!("remote control listener conversion failed: {err}");
                        return;
                    }
                };
                let app = router(tx);

                let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });

                if let Err(err) = serve.await {
                    eprintln!("remote control server error: {err}");
                }
            });
        });

        Ok(Self {
            rx,
            shutdown: Some(shutdown_tx),
            info,
        })
    }

    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for RemoteServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Applies queued remote commands to the controller. Call once per frame.
pub fn drain_remote_commands<V: VideoElement, A: AudioElement>(
    remote: Option<&mut RemoteServer>,
    controller: &mut PlaybackController<V, A>,
    viewport_width: u32,
    images_ready: bool,
    videos_ready: bool,
) {
    let Some(remote) = remote else {
        return;
    };

    while let Ok(cmd) = remote.rx.try_recv() {
        match cmd {
            RemoteCmd::GetState { respond } => {
                let _ = respond.send(api::snapshot(
                    controller.state(),
                    images_ready,
                    videos_ready,
                ));
            }
            RemoteCmd::Apply { action_id, respond } => match api::action_from_id(&action_id) {
                Some(event) => {
                    controller.apply(event, viewport_width);
                    let _ = respond.send(Ok(api::snapshot(
                        controller.state(),
                        images_ready,
                        videos_ready,
                    )));
                }
                None => {
                    let _ = respond.send(Err(format!("unknown actionId: {action_id}")));
                }
            },
        }
    }
}

/// Minimal HTTP client for the remote API, used by integration tests and
/// scripting against a running viewer.
pub mod client {
    use std::fmt;
    use std::net::SocketAddr;

    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use hyper::Request;
    use hyper::header::CONTENT_TYPE;
    use hyper_util::client::legacy::Client;
    use hyper_util::rt::TokioExecutor;

    use crate::api::{EventRequest, ViewerSnapshot};

    #[derive(Debug)]
    pub enum ClientError {
        Http(String),
        Status(u16, String),
        Parse(String),
    }

    impl fmt::Display for ClientError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ClientError::Http(msg) => write!(f, "http error: {msg}"),
                ClientError::Status(code, body) => {
                    write!(f, "unexpected status {code}: {body}")
                }
                ClientError::Parse(msg) => write!(f, "bad response body: {msg}"),
            }
        }
    }

    impl std::error::Error for ClientError {}

    fn http_client() -> Client<hyper_util::client::legacy::connect::HttpConnector, Full<Bytes>> {
        Client::builder(TokioExecutor::new()).build_http()
    }

    async fn dispatch(req: Request<Full<Bytes>>) -> Result<ViewerSnapshot, ClientError> {
        let res = http_client()
            .request(req)
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let status = res.status();
        let body = res
            .into_body()
            .collect()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?
            .to_bytes();

        if !status.is_success() {
            return Err(ClientError::Status(
                status.as_u16(),
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }

    pub async fn fetch_state(addr: SocketAddr) -> Result<ViewerSnapshot, ClientError> {
        let req = Request::builder()
            .uri(format!("http://{addr}/api/viewer/state"))
            .body(Full::new(Bytes::new()))
            .map_err(|e| ClientError::Http(e.to_string()))?;
        dispatch(req).await
    }

    pub async fn post_event(
        addr: SocketAddr,
        action_id: &str,
    ) -> Result<ViewerSnapshot, ClientError> {
        let payload = serde_json::to_vec(&EventRequest {
            action_id: action_id.to_string(),
        })
        .map_err(|e| ClientError::Parse(e.to_string()))?;
        let req = Request::builder()
            .method("POST")
            .uri(format!("http://{addr}/api/viewer/event"))
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| ClientError::Http(e.to_string()))?;
        dispatch(req).await
    }
}
