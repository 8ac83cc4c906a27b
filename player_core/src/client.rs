use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;
use tts_core::SynthesisRequest;

use crate::error::PlaybackError;

pub const SYNTHESIZE_PATH: &str = "/api/v1/tts/synthesize";

/// Successful answer from the synthesis endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisReply {
    pub audio_url: String,
    #[serde(default)]
    pub estimated_tokens: u64,
}

/// Network side of the controller; swapped for a double in tests.
#[async_trait]
pub trait SynthesisClient: Send + Sync + 'static {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisReply, PlaybackError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Talks to the synthesis server over HTTP
#[derive(Debug, Clone)]
pub struct HttpSynthesisClient {
    client: Client,
    base: Url,
}

impl HttpSynthesisClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// Make a server-relative locator absolute; absolute ones pass through
    pub fn resolve(&self, locator: &str) -> Result<String, PlaybackError> {
        self.base
            .join(locator)
            .map(String::from)
            .map_err(|e| PlaybackError::Request(format!("Bad audio URL '{locator}': {e}")))
    }
}

#[async_trait]
impl SynthesisClient for HttpSynthesisClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisReply, PlaybackError> {
        let url = self
            .base
            .join(SYNTHESIZE_PATH)
            .map_err(|e| PlaybackError::Request(e.to_string()))?;
        debug!("POST {url} voice={} speed={}", request.voice, request.speed);

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("Server responded with {status}"));
            return Err(PlaybackError::Server(message));
        }

        let mut reply: SynthesisReply = response.json().await?;
        if reply.audio_url.is_empty() {
            return Err(PlaybackError::Server("Failed to synthesize audio.".to_string()));
        }
        reply.audio_url = self.resolve(&reply.audio_url)?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let client = HttpSynthesisClient::new("http://127.0.0.1:5000").unwrap();
        assert_eq!(
            client.resolve("/audio/tts_1.wav").unwrap(),
            "http://127.0.0.1:5000/audio/tts_1.wav"
        );
        assert_eq!(
            client.resolve("https://cdn.example.com/a.mp3").unwrap(),
            "https://cdn.example.com/a.mp3"
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(HttpSynthesisClient::new("not a url").is_err());
    }

    #[test]
    fn test_reply_wire_format() {
        let reply: SynthesisReply =
            serde_json::from_str(r#"{"audioUrl":"/audio/a.wav","estimatedTokens":12}"#).unwrap();
        assert_eq!(reply.audio_url, "/audio/a.wav");
        assert_eq!(reply.estimated_tokens, 12);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        // port 9 (discard) is essentially never listening on loopback
        let client = HttpSynthesisClient::new("http://127.0.0.1:9").unwrap();
        let err = client
            .synthesize(&SynthesisRequest::new("hi", tts_core::Voice::DefaultMale, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, PlaybackError::Request(_)));
    }
}
