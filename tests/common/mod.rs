// Allow dead code: not every test binary uses every helper
#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use http::{header, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the mock server saw for one request.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub path: String,
    pub cookie: Option<String>,
    /// Parsed JSON body, `Null` when the request had none
    pub body: Value,
}

impl Received {
    async fn from_request(req: Request<Incoming>) -> Self {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let cookie = req
            .headers()
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = req
            .into_body()
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .unwrap_or_default();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Self {
            method,
            path,
            cookie,
            body,
        }
    }
}

/// In-process HTTP server backing the client under test.
///
/// The handler runs for every request; the server also records each request
/// and counts them, so tests can assert that a cached path made no call.
pub struct MockApi {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Received>>>,
    handle: JoinHandle<()>,
}

impl MockApi {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Received) -> Response<Full<Bytes>> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Failed to read mock server address");

        let hits = Arc::new(AtomicUsize::new(0));
        let requests: Arc<Mutex<Vec<Received>>> = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<dyn Fn(&Received) -> Response<Full<Bytes>> + Send + Sync> =
            Arc::new(handler);

        let task_hits = hits.clone();
        let task_requests = requests.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let hits = task_hits.clone();
                let requests = task_requests.clone();
                let handler = handler.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let hits = hits.clone();
                        let requests = requests.clone();
                        let handler = handler.clone();
                        async move {
                            let received = Received::from_request(req).await;
                            hits.fetch_add(1, Ordering::SeqCst);
                            let response = handler(&received);
                            requests.lock().unwrap().push(received);
                            Ok::<_, Infallible>(response)
                        }
                    });
                    // Connection errors are expected when a test drops the client
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            addr,
            hits,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Total requests served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Everything the server has seen, in arrival order
    pub fn requests(&self) -> Vec<Received> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ===== Response Builders =====

pub fn json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("Failed to build mock response")
}

/// Error body in the backend's `{"error": "..."}` shape
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &json!({ "error": message }))
}

/// Plain-text body, for responses a proxy or crashed backend might send
pub fn text_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("Failed to build mock response")
}

/// Success response that also sets a cookie, like the signin endpoint does
pub fn json_with_cookie(status: StatusCode, body: &Value, cookie: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::SET_COOKIE, cookie)
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("Failed to build mock response")
}

// ===== Canned Bodies =====

pub fn user_json() -> Value {
    json!({
        "id": "68a1f0c2e4b0a1b2c3d4e5a1",
        "email": "alice@example.com",
        "username": "alice",
        "created_at": "2025-06-01T08:00:00Z"
    })
}

pub fn list_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "user_id": "68a1f0c2e4b0a1b2c3d4e5a1",
        "name": name,
        "items": [],
        "shared_with": [],
        "created_at": "2025-07-18T09:00:00Z",
        "updated_at": "2025-07-18T09:00:00Z"
    })
}
