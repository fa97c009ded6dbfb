//! Test doubles shared by the session tests.

use async_trait::async_trait;
use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storefront_core::User;
use storefront_store::{MemoryStore, PersistedStore, StoreError, StoreResult};
use tokio::sync::Notify;

use crate::error::{AuthError, SignupError};
use crate::service::{AuthService, Credentials, SignupRequest};

// =============================================================================
// In-process identity server
// =============================================================================

/// Canned identity service behaviour plus a log of received requests.
#[derive(Clone)]
pub struct IdentityStub {
    status: StatusCode,
    login_body: Value,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl IdentityStub {
    /// Answers every request with 200 and `login_body`.
    pub fn accepting(login_body: Value) -> Self {
        IdentityStub {
            status: StatusCode::OK,
            login_body,
            requests: Arc::default(),
        }
    }

    /// Answers every request with `status` and an empty body.
    pub fn rejecting(status: StatusCode) -> Self {
        IdentityStub {
            status,
            login_body: Value::Null,
            requests: Arc::default(),
        }
    }

    /// `(path, json body)` of every request so far.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(stub): State<IdentityStub>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.requests
        .lock()
        .unwrap()
        .push((uri.path().to_string(), body));
    (stub.status, Json(stub.login_body.clone()))
}

/// Serves `stub` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_identity_server(stub: IdentityStub) -> String {
    let app = Router::new()
        .route("/auth/login", post(handle))
        .route("/auth/signup", post(handle))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}")
}

// =============================================================================
// Scripted auth service
// =============================================================================

/// [`AuthService`] that replays queued outcomes.
///
/// An empty login queue answers `Rejected { status: 401 }`; an empty signup
/// queue answers `Ok(())`. With a gate installed every call waits for
/// [`ScriptedAuthService::release`] before answering.
#[derive(Default)]
pub struct ScriptedAuthService {
    logins: Mutex<VecDeque<Result<User, AuthError>>>,
    signups: Mutex<VecDeque<Result<(), SignupError>>>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl ScriptedAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        ScriptedAuthService {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub fn push_login(&self, outcome: Result<User, AuthError>) {
        self.logins.lock().unwrap().push_back(outcome);
    }

    pub fn push_signup(&self, outcome: Result<(), SignupError>) {
        self.signups.lock().unwrap().push_back(outcome);
    }

    /// Lets one gated call through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait_for_gate(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl AuthService for ScriptedAuthService {
    async fn login(&self, _credentials: &Credentials) -> Result<User, AuthError> {
        self.wait_for_gate().await;
        self.logins
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AuthError::Rejected { status: 401 }))
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<(), SignupError> {
        self.wait_for_gate().await;
        self.signups.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

// =============================================================================
// Instrumented stores
// =============================================================================

/// Wraps a [`MemoryStore`], counting reads and optionally slowing them down.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    reads: AtomicUsize,
    read_delay: Option<Duration>,
}

impl CountingStore {
    pub fn slow(inner: MemoryStore, read_delay: Duration) -> Self {
        CountingStore {
            inner,
            reads: AtomicUsize::new(0),
            read_delay: Some(read_delay),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersistedStore for CountingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key).await
    }
}

/// Store whose batch write applies the first entry and then fails, as a
/// non-transactional backend would on a mid-write fault. Single-key
/// operations work normally.
#[derive(Default)]
pub struct TornWriteStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl PersistedStore for TornWriteStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key).await
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        if let Some((key, value)) = entries.first() {
            self.inner.set(key, value).await?;
        }
        Err(StoreError::QueryFailed("disk full".to_string()))
    }
}
