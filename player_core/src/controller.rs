//! Playback session controller.
//!
//! The controller owns one [`PlaybackSession`], the media element bound to
//! it, and at most one in-flight synthesis task. Every method is called from
//! the task that owns the controller; the synthesis request itself runs on a
//! spawned tokio task whose result is applied by [`PlaybackController::settle`]
//! or [`PlaybackController::poll_synthesis`].

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};
use tts_core::{rough_client_estimate, SynthesisRequest, Voice};

use crate::client::{SynthesisClient, SynthesisReply};
use crate::element::{AudioElement, ElementFactory};
use crate::error::PlaybackError;
use crate::session::PlaybackSession;

type SynthesisOutcome = Result<SynthesisReply, PlaybackError>;

/// What a play/pause press ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAction {
    /// Nothing to do: a request is already loading, or there is no text
    Ignored,
    Paused,
    Resumed,
    /// The bound element refused to play; the reason is in `last_error`
    ResumeFailed,
    SynthesisStarted,
    /// The estimate is above the confirmation threshold; call
    /// [`PlaybackController::confirm_synthesis`] to go ahead
    ConfirmationRequired(u64),
}

/// Notifications coming from the bound media element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Ended,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Upper bound for one synthesis request
    pub timeout: Duration,
    /// Ask before synthesizing when the rough estimate exceeds this
    pub confirm_above: Option<u64>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            confirm_above: None,
        }
    }
}

pub struct PlaybackController<C, F: ElementFactory> {
    client: Arc<C>,
    factory: F,
    options: ControllerOptions,
    session: PlaybackSession,
    element: Option<F::Element>,
    text: String,
    pending: Option<JoinHandle<SynthesisOutcome>>,
    awaiting_confirmation: bool,
}

impl<C, F> PlaybackController<C, F>
where
    C: SynthesisClient,
    F: ElementFactory,
{
    pub fn new(client: Arc<C>, factory: F) -> Self {
        Self::with_options(client, factory, ControllerOptions::default())
    }

    pub fn with_options(client: Arc<C>, factory: F, options: ControllerOptions) -> Self {
        Self {
            client,
            factory,
            options,
            session: PlaybackSession::default(),
            element: None,
            text: String::new(),
            pending: None,
            awaiting_confirmation: false,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn element(&self) -> Option<&F::Element> {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> Option<&mut F::Element> {
        self.element.as_mut()
    }

    pub fn is_synthesis_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the text to speak. Different text invalidates the current audio.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.stop();
        }
    }

    /// Pause, resume, or start synthesizing the current text.
    ///
    /// Must be called inside a tokio runtime: starting a synthesis spawns a task.
    pub fn toggle_play_pause(&mut self) -> PlayAction {
        if self.session.is_loading {
            return PlayAction::Ignored;
        }
        self.session.last_error = None;

        if self.session.is_playing {
            if let Some(element) = self.element.as_mut() {
                element.pause();
            }
            self.session.is_playing = false;
            return PlayAction::Paused;
        }

        if let Some(element) = self.element.as_mut() {
            return match element.play() {
                Ok(()) => {
                    self.session.is_playing = true;
                    PlayAction::Resumed
                }
                Err(e) => {
                    warn!("Resume failed: {e}");
                    self.session.last_error = Some(e.to_string());
                    PlayAction::ResumeFailed
                }
            };
        }

        if self.text.is_empty() {
            return PlayAction::Ignored;
        }

        let estimate = rough_client_estimate(&self.text);
        self.session.token_estimate = estimate;
        if matches!(self.options.confirm_above, Some(limit) if estimate > limit) {
            self.awaiting_confirmation = true;
            return PlayAction::ConfirmationRequired(estimate);
        }

        self.start_synthesis();
        PlayAction::SynthesisStarted
    }

    /// Go ahead with a synthesis that asked for confirmation
    pub fn confirm_synthesis(&mut self) -> PlayAction {
        if !self.awaiting_confirmation || self.session.is_loading || self.element.is_some() {
            return PlayAction::Ignored;
        }
        self.awaiting_confirmation = false;
        self.session.last_error = None;
        self.start_synthesis();
        PlayAction::SynthesisStarted
    }

    pub fn cancel_confirmation(&mut self) {
        self.awaiting_confirmation = false;
    }

    fn start_synthesis(&mut self) {
        let request = SynthesisRequest::new(self.text.clone(), self.session.voice, self.session.speed);
        let client = Arc::clone(&self.client);
        let timeout = self.options.timeout;

        info!(
            "Requesting synthesis: {} chars, voice={}, speed={}",
            request.text.chars().count(),
            request.voice,
            request.speed
        );
        self.session.is_loading = true;
        self.pending = Some(tokio::spawn(async move {
            match tokio::time::timeout(timeout, client.synthesize(&request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(PlaybackError::Timeout(timeout)),
            }
        }));
    }

    /// Wait for the in-flight synthesis (if any) and apply its result.
    ///
    /// Returns false when nothing was pending. Cancel safe: dropping the
    /// future leaves the request in place.
    pub async fn settle(&mut self) -> bool {
        let Some(handle) = self.pending.as_mut() else {
            return false;
        };
        let outcome = handle.await;
        self.pending = None;
        self.finish_synthesis(outcome);
        true
    }

    /// Apply the synthesis result if it is ready, without waiting
    pub fn poll_synthesis(&mut self) -> bool {
        let Some(handle) = self.pending.as_mut() else {
            return false;
        };
        if !handle.is_finished() {
            return false;
        }
        match handle.now_or_never() {
            Some(outcome) => {
                self.pending = None;
                self.finish_synthesis(outcome);
                true
            }
            None => false,
        }
    }

    fn finish_synthesis(&mut self, outcome: Result<SynthesisOutcome, JoinError>) {
        self.session.is_loading = false;
        match outcome {
            Ok(Ok(reply)) => self.bind(reply),
            Ok(Err(e)) => {
                warn!("Synthesis failed: {e}");
                self.session.last_error = Some(e.to_string());
            }
            Err(e) if e.is_cancelled() => debug!("Synthesis task cancelled"),
            Err(e) => {
                warn!("Synthesis task failed: {e}");
                self.session.last_error = Some(PlaybackError::Unknown(e.to_string()).to_string());
            }
        }
    }

    fn bind(&mut self, reply: SynthesisReply) {
        let mut element = self.factory.create(&reply.audio_url);
        element.set_volume(self.session.volume);

        self.session.token_estimate = reply.estimated_tokens;
        self.session.source_url = Some(reply.audio_url);
        match element.play() {
            Ok(()) => self.session.is_playing = true,
            Err(e) => {
                warn!("Could not start playback: {e}");
                self.session.last_error = Some(e.to_string());
            }
        }
        self.element = Some(element);
    }

    /// Feed completion and failure notifications from the media element
    pub fn handle_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Ended => {
                debug!("Playback finished");
                self.element = None;
                self.session.source_url = None;
                self.session.is_playing = false;
            }
            PlaybackEvent::Error(message) => {
                warn!("Audio playback error: {message}");
                if let Some(element) = self.element.as_mut() {
                    element.pause();
                }
                self.session.last_error = Some(format!("Audio playback error: {message}"));
                self.session.is_playing = false;
                self.session.is_loading = false;
            }
        }
    }

    /// Rewind and release the current audio; any in-flight request is dropped
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("Discarding in-flight synthesis");
            handle.abort();
        }
        if let Some(mut element) = self.element.take() {
            element.pause();
            element.set_position(0.0);
        }
        self.awaiting_confirmation = false;
        self.session.last_error = None;
        self.session.reset();
    }

    /// Seek relative to the current position, never before zero
    pub fn skip(&mut self, delta_seconds: f64) {
        if let Some(element) = self.element.as_mut() {
            let target = (element.position() + delta_seconds).max(0.0);
            element.set_position(target);
        }
    }

    /// Takes effect on the next synthesis; audio already fetched keeps its rate
    pub fn set_speed(&mut self, speed: f32) {
        self.session.set_speed(speed);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.session.set_volume(volume);
        if let Some(element) = self.element.as_mut() {
            element.set_volume(self.session.volume);
        }
    }

    /// Audio rendered for another voice is useless, so this always stops
    pub fn set_voice(&mut self, voice: Voice) {
        self.session.voice = voice;
        self.stop();
    }
}
