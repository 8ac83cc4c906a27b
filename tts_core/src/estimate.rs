//! Billing-unit estimates for synthesis requests.
//!
//! Providers bill differently (characters, bytes, audio seconds, or a flat
//! fee per request). Everything that needs a cost figure goes through
//! [`estimate_tokens`] so the unit can change without touching callers.

use crate::Voice;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BillingUnit {
    /// One token per Unicode scalar value
    #[default]
    PerCharacter,
    /// One token per UTF-8 byte
    PerByte,
    /// One token per started second of speech at the given speaking rate
    PerSecond { chars_per_second: f32 },
    /// Fixed price regardless of input size
    FlatPerRequest(u64),
}

/// Estimate the provider billing units for `text` spoken by `voice`.
///
/// Empty text is free for every unit.
pub fn estimate_tokens(text: &str, _voice: Voice, unit: BillingUnit) -> u64 {
    if text.is_empty() {
        return 0;
    }
    match unit {
        BillingUnit::PerCharacter => text.chars().count() as u64,
        BillingUnit::PerByte => text.len() as u64,
        BillingUnit::PerSecond { chars_per_second } => {
            let rate = if chars_per_second.is_finite() && chars_per_second > 0.0 {
                chars_per_second as f64
            } else {
                DEFAULT_CHARS_PER_SECOND as f64
            };
            (text.chars().count() as f64 / rate).ceil() as u64
        }
        BillingUnit::FlatPerRequest(n) => n,
    }
}

/// Average speaking rate used when a provider does not report one.
pub const DEFAULT_CHARS_PER_SECOND: f32 = 15.0;

/// Quick client-side guess shown while the server computes the real figure.
///
/// Deliberately independent of [`estimate_tokens`]; the two are not reconciled.
pub fn rough_client_estimate(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(10)
}
