use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ApiError;
use crate::metrics::MetricsResponse;
use crate::validation::validate_synthesis_request;
use crate::AppState;

/// Public prefix the audio store is served under
pub const AUDIO_ROUTE: &str = "/audio";

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub speed: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    pub audio_url: String,
    pub estimated_tokens: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct VoiceInfo {
    id: &'static str,
    name: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

pub async fn list_voices() -> Json<Vec<VoiceInfo>> {
    Json(
        tts_core::Voice::ALL
            .into_iter()
            .map(|v| VoiceInfo {
                id: v.id(),
                name: v.display_name(),
            })
            .collect(),
    )
}

/// Map a stored file to the URL it is served from (basename only)
pub fn public_audio_url(path: &Path) -> Result<String, ApiError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ApiError::InternalError(format!("Unusable audio path: {}", path.display())))?;
    Ok(format!("{AUDIO_ROUTE}/{name}"))
}

pub async fn synthesize_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    let start = Instant::now();
    let result = synthesize(&state, payload).await;

    let metrics = &state.metrics.synthesize;
    metrics.record_request(start.elapsed().as_millis() as u64);
    if result.is_err() {
        metrics.record_error();
    }
    result.map(Json)
}

async fn synthesize(
    state: &AppState,
    payload: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> Result<SynthesizeResponse, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let request = validate_synthesis_request(
        req.text.as_deref(),
        req.voice.as_deref(),
        req.speed,
        state.config.default_voice,
        state.config.max_text_length,
    )?;

    // Estimate cost before making the expensive call
    let estimated_tokens = state.provider.estimate(&request.text, request.voice);
    state.gate.admit(&request, estimated_tokens).await?;

    let timeout = state.config.provider_timeout();
    let path = match tokio::time::timeout(timeout, state.provider.synthesize(&request)).await {
        Ok(Ok(path)) => path,
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            state.metrics.provider_timeouts.fetch_add(1, Ordering::Relaxed);
            error!("Provider '{}' did not answer within {:?}", state.provider.name(), timeout);
            return Err(ApiError::Timeout(timeout.as_secs()));
        }
    };

    let audio_url = public_audio_url(&path)?;
    state
        .metrics
        .estimated_tokens_total
        .fetch_add(estimated_tokens, Ordering::Relaxed);
    info!(
        "Generated speech via '{}': voice={}, speed={}, estimated tokens={}",
        state.provider.name(),
        request.voice,
        request.speed,
        estimated_tokens
    );

    Ok(SynthesizeResponse {
        audio_url,
        estimated_tokens,
    })
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Json<MetricsResponse> {
    let mut system = sysinfo::System::new();
    system.refresh_memory();

    Json(MetricsResponse {
        timestamp: Utc::now(),
        uptime_seconds: state.metrics.uptime_seconds(),
        memory_used_mb: system.used_memory() / 1024 / 1024,
        memory_total_mb: system.total_memory() / 1024 / 1024,
        synthesize: state.metrics.synthesize.stats(),
        estimated_tokens_total: state.metrics.estimated_tokens_total.load(Ordering::Relaxed),
        provider_timeouts: state.metrics.provider_timeouts.load(Ordering::Relaxed),
    })
}
