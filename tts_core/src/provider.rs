use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::estimate::{estimate_tokens, BillingUnit};
use crate::Voice;

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;
pub const DEFAULT_SPEED: f32 = 1.0;

/// One synthesis call. Built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: Voice,
    pub speed: f32,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: Voice, speed: f32) -> Self {
        Self {
            text: text.into(),
            voice,
            speed,
        }
    }
}

/// Failures reported by a synthesis provider.
///
/// The `Display` text is what callers ultimately see, so keep it readable.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid voice: {0}")]
    InvalidVoice(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Audio storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Text-to-speech backend consumed by the synthesis endpoint.
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Render `request` and return the path of the stored audio file
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<PathBuf, ProviderError>;

    /// Billing units this provider would charge for `text`
    fn estimate(&self, text: &str, voice: Voice) -> u64 {
        estimate_tokens(text, voice, BillingUnit::PerCharacter)
    }

    fn name(&self) -> &str;
}
