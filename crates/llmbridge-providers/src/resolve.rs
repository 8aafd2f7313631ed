//! Configuration resolution — merges caller intent with defaults and the
//! detected provider.

use std::time::Duration;

use llmbridge_core::config::{LlmConfig, DEFAULT_TIMEOUT_MS, DEFAULT_TRACING_ENABLED};
use llmbridge_core::diagnostics::{DiagnosticSink, TracingSink};
use llmbridge_core::types::Provider;

use crate::registry::detect_provider_with;

/// A configuration whose provider, timeout and tracing flag are always set.
///
/// Only obtainable through [`ResolvedConfig::resolve`], so every request that
/// leaves the dispatcher has gone through the merge.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    config: LlmConfig,
    provider: Provider,
    timeout_ms: u64,
    tracing_enabled: bool,
}

impl ResolvedConfig {
    /// Merge `config` with defaults:
    /// - provider: explicit, else detected from the model name
    /// - timeout: explicit non-zero value, else 90 000 ms
    /// - tracing: explicit, else enabled
    ///
    /// Idempotent; resolving `resolved.config()` again yields the same value.
    pub fn resolve(config: LlmConfig) -> Self {
        Self::resolve_with(config, &TracingSink)
    }

    /// [`ResolvedConfig::resolve`] reporting detection fallbacks to `sink`.
    pub fn resolve_with(mut config: LlmConfig, sink: &dyn DiagnosticSink) -> Self {
        let provider = config
            .provider
            .unwrap_or_else(|| detect_provider_with(&config.model, sink));
        let timeout_ms = config
            .timeout_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let tracing_enabled = config.tracing_enabled.unwrap_or(DEFAULT_TRACING_ENABLED);

        config.provider = Some(provider);
        config.timeout_ms = Some(timeout_ms);
        config.tracing_enabled = Some(tracing_enabled);

        ResolvedConfig {
            config,
            provider,
            timeout_ms,
            tracing_enabled,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn tracing_enabled(&self) -> bool {
        self.tracing_enabled
    }

    /// Borrow the merged configuration.
    pub fn as_config(&self) -> &LlmConfig {
        &self.config
    }

    /// A copy of the merged configuration.
    pub fn config(&self) -> LlmConfig {
        self.config.clone()
    }
}
