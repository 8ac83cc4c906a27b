use serde::Serialize;
use tts_core::{Voice, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};

/// State of one playback lifecycle, owned by a single controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSession {
    pub source_url: Option<String>,
    pub is_playing: bool,
    pub is_loading: bool,
    pub speed: f32,
    pub volume: f32,
    pub voice: Voice,
    pub last_error: Option<String>,
    pub token_estimate: u64,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            source_url: None,
            is_playing: false,
            is_loading: false,
            speed: DEFAULT_SPEED,
            volume: 1.0,
            voice: Voice::default(),
            last_error: None,
            token_estimate: 0,
        }
    }
}

impl PlaybackSession {
    /// Drop everything tied to the current audio; preferences and the error slot stay
    pub fn reset(&mut self) {
        self.source_url = None;
        self.is_playing = false;
        self.is_loading = false;
    }

    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}
