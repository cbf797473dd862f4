//! Explanation side-channel: debounced requests to an external provider.

pub mod provider;
pub mod trigger;

pub use provider::{
    ExplainRequest, ExplanationProvider, HttpExplanationProvider, MockProvider, ProviderError,
};
pub use trigger::{ExplanationEvent, ExplanationTrigger, RequestKey};
