//! Common utilities for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use tts_core::{ProviderError, SynthesisProvider, SynthesisRequest};

use server::config::ServerConfig;
use server::{build_router, AppState};

/// What a [`FakeProvider`] does when called
pub enum Behavior {
    Succeed(PathBuf),
    Fail(String),
    Hang,
}

/// Provider double that records every call
pub struct FakeProvider {
    behavior: Behavior,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<SynthesisRequest>>,
}

impl FakeProvider {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynthesisProvider for FakeProvider {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<PathBuf, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.behavior {
            Behavior::Succeed(path) => Ok(path.clone()),
            Behavior::Fail(msg) => Err(ProviderError::Other(msg.clone())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProviderError::Unavailable("unreachable".into()))
            }
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub fn test_config(audio_dir: &Path) -> ServerConfig {
    ServerConfig {
        audio_dir: audio_dir.to_path_buf(),
        provider_timeout_secs: 1,
        ..ServerConfig::default()
    }
}

/// Create a test app instance around `provider`
pub fn create_test_app(provider: Arc<dyn SynthesisProvider>, audio_dir: &Path) -> Router {
    build_router(AppState::new(provider, test_config(audio_dir)))
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}
