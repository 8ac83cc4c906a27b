//! Stand-in provider used until a real speech backend is wired in.
//!
//! It renders silence of roughly the right length so the rest of the
//! pipeline (storage, static serving, playback) can be exercised end to end.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::estimate::DEFAULT_CHARS_PER_SECOND;
use crate::provider::{ProviderError, SynthesisProvider, SynthesisRequest, MAX_SPEED, MIN_SPEED};
use crate::store::AudioStore;
use crate::wav;

/// Longest clip the placeholder will write
const MAX_CLIP_SECS: f32 = 600.0;

#[derive(Debug, Clone)]
pub struct PlaceholderProvider {
    store: AudioStore,
    sample_rate: u32,
}

impl PlaceholderProvider {
    pub fn new(store: AudioStore) -> Self {
        Self {
            store,
            sample_rate: wav::SAMPLE_RATE,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Approximate spoken duration of `text` at `speed`
    pub fn clip_seconds(text: &str, speed: f32) -> f32 {
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        let secs = text.chars().count() as f32 / DEFAULT_CHARS_PER_SECOND / speed;
        secs.min(MAX_CLIP_SECS)
    }
}

#[async_trait]
impl SynthesisProvider for PlaceholderProvider {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<PathBuf, ProviderError> {
        if request.text.trim().is_empty() {
            return Err(ProviderError::MalformedInput("text is empty".to_string()));
        }

        let preview: String = request.text.chars().take(50).collect();
        info!(
            "Synthesizing \"{}...\", voice={}, speed={}",
            preview, request.voice, request.speed
        );

        let seconds = Self::clip_seconds(&request.text, request.speed);
        let sample_rate = self.sample_rate;
        // Rendering a long clip is CPU-bound; keep it off the async workers
        let bytes = tokio::task::spawn_blocking(move || wav::silence(seconds, sample_rate))
            .await
            .map_err(|e| ProviderError::Other(format!("Audio rendering task failed: {e}")))?
            .map_err(|e| ProviderError::Other(format!("WAV encoding error: {e}")))?;
        let path = self.store.write(&bytes, "wav").await?;

        info!("Placeholder audio ({seconds:.1}s) saved to {}", path.display());
        Ok(path)
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}
