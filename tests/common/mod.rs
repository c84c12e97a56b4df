use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tempfile::TempDir;

use scambait::config::{ClassifierConfig, NotifyPolicy};
use scambait::detection::PatternLibrary;
use scambait::notifier::{NoopNotifier, Notifier};
use scambait::orchestrator::Orchestrator;
use scambait::server::{build_router, AppState};
use scambait::session::{InMemorySessionStore, SessionStore, SqliteSessionStore};

#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-key";

#[allow(dead_code)]
pub fn orchestrator_with(
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    policy: NotifyPolicy,
) -> Orchestrator {
    Orchestrator::new(
        Arc::new(PatternLibrary::builtin().expect("builtin patterns")),
        ClassifierConfig::default(),
        store,
        notifier,
    )
    .with_notify_policy(policy, Duration::from_secs(2))
}

/// Router over an in-memory store with reporting disabled
#[allow(dead_code)]
pub fn test_router() -> (Router, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator_with(
        store.clone(),
        Arc::new(NoopNotifier),
        NotifyPolicy::OncePerSession,
    );
    let state = AppState::new(Arc::new(orchestrator), TEST_API_KEY);
    (build_router(state), store)
}

#[allow(dead_code)]
pub fn create_temp_store() -> (SqliteSessionStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("sessions.db");
    let store =
        SqliteSessionStore::new_with_path(db_path).expect("failed to create sqlite store with path");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Build a request, optionally carrying the API key and a JSON body
#[allow(dead_code)]
pub fn make_request(method: &str, uri: &str, api_key: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request"),
        None => builder.body(Body::empty()).expect("valid request"),
    }
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("json body")
}
