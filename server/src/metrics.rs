// Metrics collection and tracking

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

const LATENCY_WINDOW: usize = 1000;

/// Per-endpoint metrics
#[derive(Debug)]
pub struct EndpointMetrics {
    request_count: AtomicU64,
    error_count: AtomicU64,
    total_latency_ms: AtomicU64,
    max_latency_ms: AtomicU64,
    // last LATENCY_WINDOW samples, for percentiles
    latency_samples: Mutex<VecDeque<u64>>,
}

impl EndpointMetrics {
    pub fn new() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            max_latency_ms: AtomicU64::new(0),
            latency_samples: Mutex::new(VecDeque::with_capacity(LATENCY_WINDOW)),
        }
    }

    pub fn record_request(&self, latency_ms: u64) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.max_latency_ms.fetch_max(latency_ms, Ordering::Relaxed);

        if let Ok(mut samples) = self.latency_samples.lock() {
            if samples.len() == LATENCY_WINDOW {
                samples.pop_front();
            }
            samples.push_back(latency_ms);
        }
    }

    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn avg_latency_ms(&self) -> f64 {
        let count = self.request_count();
        if count == 0 {
            return 0.0;
        }
        self.total_latency_ms.load(Ordering::Relaxed) as f64 / count as f64
    }

    pub fn percentile(&self, p: u8) -> u64 {
        let Ok(samples) = self.latency_samples.lock() else {
            return 0;
        };
        if samples.is_empty() {
            return 0;
        }
        let mut sorted: Vec<u64> = samples.iter().copied().collect();
        sorted.sort_unstable();
        let index = (sorted.len() * p as usize / 100).min(sorted.len() - 1);
        sorted[index]
    }

    pub fn stats(&self) -> EndpointStats {
        EndpointStats {
            request_count: self.request_count(),
            error_count: self.error_count(),
            avg_latency_ms: self.avg_latency_ms(),
            max_latency_ms: self.max_latency_ms.load(Ordering::Relaxed),
            p50_latency_ms: self.percentile(50),
            p95_latency_ms: self.percentile(95),
        }
    }
}

impl Default for EndpointMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Service-wide counters shared by all handlers
#[derive(Debug)]
pub struct AppMetrics {
    started: Instant,
    pub synthesize: EndpointMetrics,
    pub estimated_tokens_total: AtomicU64,
    pub provider_timeouts: AtomicU64,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            synthesize: EndpointMetrics::new(),
            estimated_tokens_total: AtomicU64::new(0),
            provider_timeouts: AtomicU64::new(0),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub synthesize: EndpointStats,
    pub estimated_tokens_total: u64,
    pub provider_timeouts: u64,
}

#[derive(Serialize)]
pub struct EndpointStats {
    pub request_count: u64,
    pub error_count: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
    pub p50_latency_ms: u64,
    pub p95_latency_ms: u64,
}
