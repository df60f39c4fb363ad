//! Shared test utilities: an in-process fake PAR endpoint
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use common::par::Par;
use common::session::{BucketSession, ParClient, SessionStatus};
use tokio::sync::Notify;

/// Any upload whose object name contains this marker is answered with a 404
pub const REJECT_MARKER: &str = "reject";

#[derive(Debug, Clone, Default)]
pub struct FakeBucket {
    pub objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    pub content_types: Arc<Mutex<BTreeMap<String, String>>>,
    pub list_requests: Arc<AtomicUsize>,
    pub fail_listing: Arc<AtomicBool>,
    pub malformed_listing: Arc<AtomicBool>,
    pub hold_listing: Arc<AtomicBool>,
    pub listing_gate: Arc<Notify>,
}

impl FakeBucket {
    pub fn list_requests(&self) -> usize {
        self.list_requests.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.content_types.lock().unwrap().get(key).cloned()
    }

    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    pub fn set_malformed_listing(&self, malformed: bool) {
        self.malformed_listing.store(malformed, Ordering::SeqCst);
    }

    /// Park every listing request until [`release_listing`](Self::release_listing)
    pub fn hold_listing(&self) {
        self.hold_listing.store(true, Ordering::SeqCst);
    }

    /// Stop holding and let one parked listing answer
    pub fn release_listing(&self) {
        self.hold_listing.store(false, Ordering::SeqCst);
        self.listing_gate.notify_one();
    }

    /// Wait until at least `count` listing requests reached the endpoint
    pub async fn wait_for_list_requests(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.list_requests() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for listing requests");
    }
}

async fn list_objects(State(bucket): State<FakeBucket>) -> Response {
    bucket.list_requests.fetch_add(1, Ordering::SeqCst);
    if bucket.hold_listing.load(Ordering::SeqCst) {
        bucket.listing_gate.notified().await;
    }
    if bucket.fail_listing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "listing unavailable").into_response();
    }
    if bucket.malformed_listing.load(Ordering::SeqCst) {
        return (StatusCode::OK, "{\"objects\": [").into_response();
    }

    let objects: Vec<_> = bucket
        .objects
        .lock()
        .unwrap()
        .iter()
        .map(|(name, data)| serde_json::json!({ "name": name, "size": data.len() }))
        .collect();
    Json(serde_json::json!({ "objects": objects })).into_response()
}

async fn get_object(
    State(bucket): State<FakeBucket>,
    Path((_token, key)): Path<(String, String)>,
) -> Response {
    match bucket.object(&key) {
        Some(data) => data.into_response(),
        None => (StatusCode::NOT_FOUND, "object not found").into_response(),
    }
}

async fn put_object(
    State(bucket): State<FakeBucket>,
    Path((_token, key)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if key.contains(REJECT_MARKER) {
        return StatusCode::NOT_FOUND;
    }
    if let Some(content_type) = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        bucket
            .content_types
            .lock()
            .unwrap()
            .insert(key.clone(), content_type.to_string());
    }
    bucket.objects.lock().unwrap().insert(key, body.to_vec());
    StatusCode::OK
}

/// Route engine logs through the test harness, filtered by RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Serve a fake bucket seeded with `keys` on an ephemeral port.
/// Returns the bucket state and a PAR addressing it.
pub async fn spawn_bucket(keys: &[&str]) -> (FakeBucket, Par) {
    init_tracing();
    let bucket = FakeBucket::default();
    {
        let mut objects = bucket.objects.lock().unwrap();
        for key in keys {
            objects.insert(key.to_string(), format!("contents of {}", key).into_bytes());
        }
    }

    let app = Router::new()
        .route("/p/:token/o/", get(list_objects))
        .route("/p/:token/o/*key", get(get_object).put(put_object))
        .with_state(bucket.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let par = Par::parse(&format!("http://{}/p/test-token/o/", addr)).unwrap();
    (bucket, par)
}

/// A PAR on a listener that accepts connections and never answers them
pub async fn spawn_silent_endpoint() -> Par {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
        }
    });
    Par::parse(&format!("http://{}/p/silent-token/o/", addr)).unwrap()
}

/// A session over a fresh client
pub fn new_session() -> BucketSession {
    BucketSession::new(ParClient::new().unwrap())
}

/// Wait until the session has published at least `generation` successful
///  listings and has nothing in flight
pub async fn wait_for_generation(session: &BucketSession, generation: u64) -> SessionStatus {
    wait_for_status(session, |s| s.generation >= generation && !s.is_listing()).await
}

pub async fn wait_for_status<F>(session: &BucketSession, predicate: F) -> SessionStatus
where
    F: FnMut(&SessionStatus) -> bool,
{
    let mut rx = session.subscribe();
    let status = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for session status")
        .expect("session status channel closed");
    status.clone()
}

/// Give any stray background task a chance to run
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
