//! Provider adapter trait — the seam between the dispatcher and a backend.
//!
//! Each backend gets one implementation. The dispatcher looks adapters up by
//! [`Provider`] and never branches on the provider itself.

use async_trait::async_trait;
use llmbridge_core::error::Result;
use llmbridge_core::types::{LlmResponse, Prompt, Provider};

use crate::resolve::ResolvedConfig;

/// Trait that all provider adapters must implement.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// The provider this adapter serves.
    fn provider(&self) -> Provider;

    /// Run one non-streaming generation.
    ///
    /// Translates `prompt` + `config` into the backend request, performs
    /// exactly one call and normalizes the outcome. Failures are always one
    /// of the typed [`LlmError`](llmbridge_core::LlmError) kinds.
    async fn generate(&self, prompt: &Prompt, config: &ResolvedConfig) -> Result<LlmResponse>;
}
