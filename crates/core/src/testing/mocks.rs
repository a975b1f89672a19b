//! Mock implementations of the core ports

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use grabbi_domain::constants::{bearer, AUTHORIZATION_HEADER};
use grabbi_domain::{ApiResponse, HttpMethod, TransportError, TransportRequest};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;

use crate::client::ports::Transport;
use crate::session::ports::{SecretStore, StoreError};

type Responder =
    Arc<dyn Fn(&TransportRequest) -> Result<ApiResponse, TransportError> + Send + Sync>;

struct Route {
    method: HttpMethod,
    path: String,
    responder: Responder,
}

/// Build a JSON response.
pub fn json_response(status: u16, body: Value) -> ApiResponse {
    let mut response = ApiResponse::new(status, body.to_string());
    response.headers.push(("content-type".to_string(), "application/json".to_string()));
    response
}

/// Holds requests to one path until opened.
#[derive(Debug, Clone)]
pub struct Gate {
    sender: Arc<watch::Sender<bool>>,
}

impl Gate {
    pub fn open(&self) {
        self.sender.send_replace(true);
    }
}

/// Transport with programmable per-route responses
///
/// Routes match on method plus a URL path suffix; the latest registration
/// wins. Unmatched requests get a 404. Every request is logged when it
/// arrives, before any gate is awaited.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    gates: Mutex<Vec<(String, watch::Receiver<bool>)>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&self, method: HttpMethod, path: &str, responder: F)
    where
        F: Fn(&TransportRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        self.routes.lock().push(Route {
            method,
            path: path.to_string(),
            responder: Arc::new(responder),
        });
    }

    /// Always answer with `status` and a JSON body.
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.on(method, path, move |_| Ok(json_response(status, body.clone())));
    }

    /// Answer 200 only when the request carries `Bearer <token>`, else 401.
    pub fn protected(&self, method: HttpMethod, path: &str, token: &str, body: Value) {
        let expected = bearer(token);
        self.on(method, path, move |request| {
            if request.header(AUTHORIZATION_HEADER) == Some(expected.as_str()) {
                Ok(json_response(200, body.clone()))
            } else {
                Ok(json_response(401, serde_json::json!({ "error": "Token expired" })))
            }
        });
    }

    /// Hold requests to `path` until the returned gate is opened.
    pub fn gate(&self, path: &str) -> Gate {
        let (sender, receiver) = watch::channel(false);
        self.gates.lock().push((path.to_string(), receiver));
        Gate { sender: Arc::new(sender) }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|request| matches_path(&request.url, path))
            .cloned()
            .collect()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }

    /// `Authorization` values sent to `path`, in order.
    pub fn authorizations_for(&self, path: &str) -> Vec<Option<String>> {
        self.requests_to(path)
            .iter()
            .map(|request| request.header(AUTHORIZATION_HEADER).map(str::to_string))
            .collect()
    }

    fn responder_for(&self, request: &TransportRequest) -> Option<Responder> {
        self.routes
            .lock()
            .iter()
            .rev()
            .find(|route| route.method == request.method && matches_path(&request.url, &route.path))
            .map(|route| route.responder.clone())
    }

    fn gate_for(&self, url: &str) -> Option<watch::Receiver<bool>> {
        self.gates
            .lock()
            .iter()
            .find(|(path, _)| matches_path(url, path))
            .map(|(_, receiver)| receiver.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().push(request.clone());

        if let Some(mut gate) = self.gate_for(&request.url) {
            let opened = gate.wait_for(|open| *open).await.is_ok();
            if !opened {
                return Err(TransportError::connect("gate dropped"));
            }
        }

        match self.responder_for(&request) {
            Some(responder) => responder(&request),
            None => Ok(ApiResponse::new(404, "")),
        }
    }
}

fn matches_path(url: &str, path: &str) -> bool {
    let url = url.split('?').next().unwrap_or(url);
    url.ends_with(path)
}

/// Counts logout callback invocations.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogout {
    calls: Arc<AtomicUsize>,
}

impl RecordingLogout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> impl Fn() + Send + Sync + 'static {
        let calls = self.calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Secret store whose every operation fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSecretStore;

impl SecretStore for FailingSecretStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::AccessFailed("backend offline".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::AccessFailed("backend offline".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
