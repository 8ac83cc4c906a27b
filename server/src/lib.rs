pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use anyhow::Context;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tts_core::SynthesisProvider;

use crate::config::ServerConfig;
use crate::gate::{AllowAll, RequestGate};
use crate::metrics::AppMetrics;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SynthesisProvider>,
    pub gate: Arc<dyn RequestGate>,
    pub metrics: Arc<AppMetrics>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(provider: Arc<dyn SynthesisProvider>, config: ServerConfig) -> Self {
        Self {
            provider,
            gate: Arc::new(AllowAll),
            metrics: Arc::new(AppMetrics::new()),
            config,
        }
    }

    pub fn with_gate(mut self, gate: Arc<dyn RequestGate>) -> Self {
        self.gate = gate;
        self
    }
}

// Request ID middleware for tracing
async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = header.clone() {
        request.headers_mut().insert("x-request-id", value);
    }
    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// CORS configuration - explicit origins when configured, permissive otherwise
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .flatten()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        if config.cors_allowed_origins.is_some() {
            warn!("CORS_ALLOWED_ORIGINS has no usable origin, falling back to permissive CORS");
        }
        base.allow_origin(Any)
    } else {
        info!("CORS configured for {} origin(s)", origins.len());
        base.allow_origin(AllowOrigin::list(origins))
    }
}

/// Routes, static audio serving and the per-request middleware.
///
/// Rate limiting (see [`with_rate_limit`]) and the request timeout are added by the binary.
pub fn build_router(state: AppState) -> Router {
    let tts = Router::new()
        .route("/synthesize", post(handlers::synthesize_endpoint))
        .route("/voices", get(handlers::list_voices));

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/v1/tts", tts);

    Router::new()
        .nest("/api", api)
        .nest_service(handlers::AUDIO_ROUTE, ServeDir::new(&state.config.audio_dir))
        .layer(axum::middleware::from_fn(add_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Wrap `router` in a global limiter when `RATE_LIMIT_PER_MINUTE` is configured.
///
/// Every client shares one bucket of `rate_limit_per_minute` requests that
/// refills one request at a time. Without a configured limit the router is
/// returned untouched.
pub fn with_rate_limit(router: Router, config: &ServerConfig) -> anyhow::Result<Router> {
    let (Some(per_minute), Some(refill_ms)) =
        (config.rate_limit_per_minute, config.rate_limit_refill_ms())
    else {
        info!("Rate limiting disabled");
        return Ok(router);
    };

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(refill_ms)
            .burst_size(per_minute)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .context("Invalid rate limit configuration")?,
    );
    info!("Rate limiting: {} requests per minute", per_minute);
    Ok(router.layer(GovernorLayer::new(governor_conf)))
}
