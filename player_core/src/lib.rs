//! Client side of text-to-speech playback: session state, the controller
//! driving it, and the seams (synthesis client, media element) it runs on.

pub mod client;
pub mod controller;
pub mod element;
mod error;
mod session;

pub use client::{HttpSynthesisClient, SynthesisClient, SynthesisReply};
pub use controller::{ControllerOptions, PlayAction, PlaybackController, PlaybackEvent};
pub use element::{AudioElement, ElementFactory, HeadlessElement, HeadlessElementFactory};
pub use error::PlaybackError;
pub use session::PlaybackSession;
