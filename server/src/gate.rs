//! Admission check run after estimation and before the provider is called.
//!
//! This is where authentication, per-user quotas or balance checks plug in.
//! The server ships with [`AllowAll`] and enforces nothing on its own.

use async_trait::async_trait;
use tts_core::SynthesisRequest;

use crate::error::ApiError;

#[async_trait]
pub trait RequestGate: Send + Sync {
    async fn admit(&self, request: &SynthesisRequest, estimated_tokens: u64) -> Result<(), ApiError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

#[async_trait]
impl RequestGate for AllowAll {
    async fn admit(&self, _request: &SynthesisRequest, _estimated_tokens: u64) -> Result<(), ApiError> {
        Ok(())
    }
}
