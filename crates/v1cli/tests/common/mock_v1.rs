//! Mock VersionOne server for testing CLI behavior without an instance.
//!
//! Listens on a loopback TCP port and implements the three endpoints the
//! client touches: POST /query.v1, POST /api/asset and GET /meta.v1/:type.
//! Responses are canned per asset type; every request is recorded for
//! verification. Query responses are served FIFO per asset type, with the
//! last configured response repeating once the queue drains, so commands
//! that issue several queries of the same type stay scriptable.

#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use serde_json::Value;
use serde_json::json;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    query_queues: HashMap<String, VecDeque<Value>>,
    query_fallbacks: HashMap<String, Value>,
    meta_responses: HashMap<String, Value>,
    asset_response: Option<Value>,
    forced_error: Option<(u16, String)>,
    forced_asset_error: Option<(u16, String)>,
    recorded: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockV1Server {
    addr: SocketAddr,
    state: Shared,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl MockV1Server {
    pub fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let router_state = state.clone();

        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime");

            runtime.block_on(async move {
                let app = Router::new()
                    .route("/query.v1", post(handle_query))
                    .route("/api/asset", post(handle_asset))
                    .route("/meta.v1/:asset_type", get(handle_meta))
                    .with_state(router_state);

                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind mock server");
                let addr = listener.local_addr().expect("local addr");
                addr_tx.send(addr).expect("report addr");

                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("serve mock server");
            });
        });

        let addr = addr_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("mock server failed to start");

        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queues one response for queries of the given asset type. The most
    /// recently queued response also becomes the fallback once the queue
    /// drains.
    pub fn push_query_rows(&self, asset_type: &str, rows: Value) {
        let mut state = self.state.lock().expect("mock state");
        state
            .query_queues
            .entry(asset_type.to_string())
            .or_default()
            .push_back(rows.clone());
        state
            .query_fallbacks
            .insert(asset_type.to_string(), rows);
    }

    /// Sets the meta response for an asset type from a list of attribute
    /// names.
    pub fn set_meta_attributes(&self, asset_type: &str, attributes: &[&str]) {
        let attrs: serde_json::Map<String, Value> = attributes
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    json!({
                        "Name": name,
                        "AttributeType": "Text",
                        "IsReadonly": false,
                        "IsRequired": false,
                        "IsMultivalue": false,
                    }),
                )
            })
            .collect();
        self.state
            .lock()
            .expect("mock state")
            .meta_responses
            .insert(asset_type.to_string(), json!({ "Attributes": attrs }));
    }

    /// Sets the response body for asset create/update calls.
    pub fn set_asset_response(&self, body: Value) {
        self.state.lock().expect("mock state").asset_response = Some(body);
    }

    /// Forces every subsequent request to fail with the given status.
    pub fn force_error(&self, status: u16, message: &str) {
        self.state.lock().expect("mock state").forced_error =
            Some((status, message.to_string()));
    }

    /// Forces only /api/asset writes to fail; queries keep working.
    pub fn force_asset_error(&self, status: u16, message: &str) {
        self.state.lock().expect("mock state").forced_asset_error =
            Some((status, message.to_string()));
    }

    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().expect("mock state").recorded.clone()
    }

    /// Bodies of /query.v1 requests, in arrival order.
    pub fn query_bodies(&self) -> Vec<Value> {
        self.recorded_requests()
            .into_iter()
            .filter(|r| r.endpoint == "/query.v1")
            .map(|r| r.body)
            .collect()
    }

    /// Bodies of /api/asset requests, in arrival order.
    pub fn asset_bodies(&self) -> Vec<Value> {
        self.recorded_requests()
            .into_iter()
            .filter(|r| r.endpoint == "/api/asset")
            .map(|r| r.body)
            .collect()
    }
}

impl Drop for MockV1Server {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

async fn handle_query(State(state): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    let mut state = state.lock().expect("mock state");
    state.recorded.push(RecordedRequest {
        endpoint: "/query.v1".to_string(),
        body: body.clone(),
    });

    if let Some((status, message)) = &state.forced_error {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({ "message": message }))).into_response();
    }

    let asset_type = body
        .get("from")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let rows = state
        .query_queues
        .get_mut(&asset_type)
        .and_then(VecDeque::pop_front)
        .or_else(|| state.query_fallbacks.get(&asset_type).cloned())
        .unwrap_or_else(|| json!([]));

    // query.v1 wraps results in a nested array
    (StatusCode::OK, Json(json!([rows]))).into_response()
}

async fn handle_asset(State(state): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    let mut state = state.lock().expect("mock state");
    state.recorded.push(RecordedRequest {
        endpoint: "/api/asset".to_string(),
        body: body.clone(),
    });

    let forced = state
        .forced_error
        .clone()
        .or_else(|| state.forced_asset_error.clone());
    if let Some((status, message)) = forced {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({ "message": message }))).into_response();
    }

    let response = state
        .asset_response
        .clone()
        .unwrap_or_else(|| json!({ "oid": "Story:9999" }));
    (StatusCode::OK, Json(response)).into_response()
}

async fn handle_meta(
    State(state): State<Shared>,
    Path(asset_type): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().expect("mock state");
    state.recorded.push(RecordedRequest {
        endpoint: format!("/meta.v1/{asset_type}"),
        body: Value::Null,
    });

    if let Some((status, message)) = &state.forced_error {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({ "message": message }))).into_response();
    }

    match state.meta_responses.get(&asset_type) {
        Some(meta) => (StatusCode::OK, Json(meta.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Unknown asset type: {asset_type}") })),
        )
            .into_response(),
    }
}
