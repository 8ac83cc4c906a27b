//! End-to-end tests: playback controller -> HTTP -> synthesis server -> audio file

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use player_core::{HeadlessElementFactory, HttpSynthesisClient, PlayAction, PlaybackController};
use tokio::net::TcpListener;
use tts_core::{AudioStore, PlaceholderProvider, SynthesisProvider};

use common::*;
use server::{build_router, AppState};

async fn spawn_server(provider: Arc<dyn SynthesisProvider>, audio_dir: &std::path::Path) -> SocketAddr {
    let app = build_router(AppState::new(provider, test_config(audio_dir)));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_play_text_through_real_server() {
    let dir = tempfile::tempdir().unwrap();
    let store = AudioStore::new(dir.path(), Duration::from_secs(60));
    let addr = spawn_server(Arc::new(PlaceholderProvider::new(store)), dir.path()).await;

    let client = HttpSynthesisClient::new(&format!("http://{addr}")).unwrap();
    let mut controller = PlaybackController::new(Arc::new(client), HeadlessElementFactory::default());
    controller.set_text("Read this paragraph aloud, please.");

    assert_eq!(controller.toggle_play_pause(), PlayAction::SynthesisStarted);
    assert!(controller.settle().await);

    let session = controller.session().clone();
    assert!(session.last_error.is_none(), "unexpected error: {:?}", session.last_error);
    assert!(session.is_playing);
    assert_eq!(session.token_estimate, 34);
    let url = session.source_url.unwrap();
    assert!(url.starts_with(&format!("http://{addr}/audio/tts_")));

    let audio = reqwest::get(&url).await.unwrap();
    assert!(audio.status().is_success());
    assert_eq!(&audio.bytes().await.unwrap()[..4], b"RIFF");

    controller.stop();
    assert!(controller.session().source_url.is_none());
}

#[tokio::test]
async fn test_provider_error_reaches_session() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(Behavior::Fail("Quota exceeded: monthly".into()));
    let addr = spawn_server(provider.clone(), dir.path()).await;

    let client = HttpSynthesisClient::new(&format!("http://{addr}")).unwrap();
    let mut controller = PlaybackController::new(Arc::new(client), HeadlessElementFactory::default());
    controller.set_text("hello");
    controller.toggle_play_pause();
    controller.settle().await;

    let session = controller.session();
    assert_eq!(session.last_error.as_deref(), Some("Quota exceeded: monthly"));
    assert!(!session.is_loading);
    assert!(session.source_url.is_none());
    assert_eq!(provider.call_count(), 1);
}
