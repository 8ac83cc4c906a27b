use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between pressing play and hearing audio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// The request never got a usable answer (connection refused, bad body...)
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with an error; the message is shown as-is
    #[error("{0}")]
    Server(String),

    #[error("Synthesis timed out after {0:?}")]
    Timeout(Duration),

    /// The media element could not play the audio
    #[error("Playback error: {0}")]
    Media(String),

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for PlaybackError {
    fn from(e: reqwest::Error) -> Self {
        PlaybackError::Request(e.to_string())
    }
}
