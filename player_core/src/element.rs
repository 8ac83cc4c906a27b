//! Media elements the controller binds synthesized audio to.

use std::time::{Duration, Instant};

use crate::error::PlaybackError;

/// A single playable audio resource.
///
/// Positions are in seconds. Implementations decide how (and whether)
/// audio actually reaches a speaker.
pub trait AudioElement {
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn position(&self) -> f64;
    fn set_position(&mut self, seconds: f64);
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
}

/// Creates an element for a resource locator.
pub trait ElementFactory {
    type Element: AudioElement;

    fn create(&self, url: &str) -> Self::Element;
}

/// Element without an audio device: a clock that advances while playing.
#[derive(Debug, Clone)]
pub struct HeadlessElement {
    url: String,
    duration: Option<f64>,
    offset: f64,
    started: Option<Instant>,
    volume: f32,
}

impl HeadlessElement {
    pub fn new(url: impl Into<String>, duration: Option<Duration>) -> Self {
        Self {
            url: url.into(),
            duration: duration.map(|d| d.as_secs_f64()),
            offset: 0.0,
            started: None,
            volume: 1.0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// True once a known duration has been played through
    pub fn has_ended(&self) -> bool {
        self.duration.is_some_and(|d| self.position() >= d)
    }

    fn clamp(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        match self.duration {
            Some(d) => seconds.min(d),
            None => seconds,
        }
    }
}

impl AudioElement for HeadlessElement {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.offset = self.position();
        self.started = None;
    }

    fn is_paused(&self) -> bool {
        self.started.is_none()
    }

    fn position(&self) -> f64 {
        let elapsed = self.started.map_or(0.0, |s| s.elapsed().as_secs_f64());
        self.clamp(self.offset + elapsed)
    }

    fn set_position(&mut self, seconds: f64) {
        self.offset = self.clamp(seconds);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

/// Builds [`HeadlessElement`]s, all with the same optional duration
#[derive(Debug, Clone, Default)]
pub struct HeadlessElementFactory {
    pub duration: Option<Duration>,
}

impl ElementFactory for HeadlessElementFactory {
    type Element = HeadlessElement;

    fn create(&self, url: &str) -> HeadlessElement {
        HeadlessElement::new(url, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_paused_at_zero() {
        let el = HeadlessElement::new("/audio/a.wav", None);
        assert!(el.is_paused());
        assert_eq!(el.position(), 0.0);
        assert_eq!(el.url(), "/audio/a.wav");
    }

    #[test]
    fn test_seek_is_clamped_to_bounds() {
        let mut el = HeadlessElement::new("a", Some(Duration::from_secs(30)));
        el.set_position(-5.0);
        assert_eq!(el.position(), 0.0);
        el.set_position(12.5);
        assert_eq!(el.position(), 12.5);
        el.set_position(99.0);
        assert_eq!(el.position(), 30.0);
        assert!(el.has_ended());
    }

    #[test]
    fn test_pause_freezes_position() {
        let mut el = HeadlessElement::new("a", None);
        el.set_position(4.0);
        el.play().unwrap();
        assert!(!el.is_paused());
        el.pause();
        let frozen = el.position();
        assert!(frozen >= 4.0);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(el.position(), frozen);
    }

    #[test]
    fn test_zero_length_clip_ends_immediately() {
        let factory = HeadlessElementFactory {
            duration: Some(Duration::ZERO),
        };
        let mut el = factory.create("a");
        el.play().unwrap();
        assert!(el.has_ended());
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut el = HeadlessElement::new("a", None);
        el.set_volume(3.0);
        assert_eq!(el.volume(), 1.0);
    }
}
