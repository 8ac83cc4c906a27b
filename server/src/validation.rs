use tts_core::{SynthesisRequest, Voice, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};

use crate::error::ApiError;

pub const TEXT_REQUIRED: &str = "Text is required.";

/// Check the raw request fields and build the provider request.
///
/// Missing voice falls back to `default_voice`, missing speed to 1.0.
/// Text length is only bounded when `max_text_length` is set.
pub fn validate_synthesis_request(
    text: Option<&str>,
    voice: Option<&str>,
    speed: Option<f64>,
    default_voice: Voice,
    max_text_length: Option<usize>,
) -> Result<SynthesisRequest, ApiError> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Err(ApiError::InvalidInput(TEXT_REQUIRED.to_string())),
    };
    if let Some(max) = max_text_length {
        if text.chars().count() > max {
            return Err(ApiError::InvalidInput(format!(
                "Text too long (max {} characters)",
                max
            )));
        }
    }

    let voice = match voice {
        Some(v) => v
            .parse::<Voice>()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?,
        None => default_voice,
    };

    let speed = match speed {
        Some(s) if !s.is_finite() || s < MIN_SPEED as f64 || s > MAX_SPEED as f64 => {
            return Err(ApiError::InvalidInput(format!(
                "Speed must be between {} and {}",
                MIN_SPEED, MAX_SPEED
            )));
        }
        Some(s) => s as f32,
        None => DEFAULT_SPEED,
    };

    Ok(SynthesisRequest::new(text, voice, speed))
}
