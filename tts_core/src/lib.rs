pub mod estimate;
mod placeholder;
mod provider;
mod store;
mod voice;
pub mod wav;

pub use estimate::{estimate_tokens, rough_client_estimate, BillingUnit};
pub use placeholder::PlaceholderProvider;
pub use provider::{
    ProviderError, SynthesisProvider, SynthesisRequest, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED,
};
pub use store::{AudioStore, FILE_PREFIX};
pub use voice::{UnknownVoice, Voice};
