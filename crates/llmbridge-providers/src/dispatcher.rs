//! The `Llm` facade — holds a resolved configuration and routes `generate`
//! calls to the adapter registered for its provider.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use llmbridge_core::config::LlmConfig;
use llmbridge_core::error::{LlmError, Result};
use llmbridge_core::types::{LlmResponse, Prompt, Provider};

use crate::openai::OpenAiAdapter;
use crate::resolve::ResolvedConfig;
use crate::traits::ProviderAdapter;

// ─────────────────────────────────────────────
// AdapterRegistry
// ─────────────────────────────────────────────

/// Lookup table from provider to adapter.
///
/// Adding a backend means registering one more adapter; the dispatcher's
/// control flow does not change.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<Provider, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    /// A registry with no adapters.
    pub fn empty() -> Self {
        AdapterRegistry {
            adapters: HashMap::new(),
        }
    }

    /// Register `adapter` under its provider, returning any adapter it replaces.
    pub fn register(
        &mut self,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.insert(adapter.provider(), adapter)
    }

    pub fn get(&self, provider: Provider) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.get(&provider)
    }

    pub fn supports(&self, provider: Provider) -> bool {
        self.adapters.contains_key(&provider)
    }
}

impl Default for AdapterRegistry {
    /// OpenAI only, bound to the process-wide client.
    fn default() -> Self {
        let mut registry = AdapterRegistry::empty();
        registry.register(Arc::new(OpenAiAdapter::shared()));
        registry
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("providers", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ─────────────────────────────────────────────
// Llm
// ─────────────────────────────────────────────

/// Provider-agnostic entry point for one logical request.
#[derive(Debug)]
pub struct Llm {
    config: ResolvedConfig,
    adapters: AdapterRegistry,
}

impl Llm {
    /// Resolve `config` and use the default adapter table.
    pub fn new(config: LlmConfig) -> Self {
        Self::with_registry(config, AdapterRegistry::default())
    }

    /// Resolve `config` and use a caller-supplied adapter table.
    pub fn with_registry(config: LlmConfig, adapters: AdapterRegistry) -> Self {
        Self::from_resolved(ResolvedConfig::resolve(config), adapters)
    }

    pub fn from_resolved(config: ResolvedConfig, adapters: AdapterRegistry) -> Self {
        Llm { config, adapters }
    }

    /// Generate a completion for `prompt`.
    ///
    /// Fails with a 400 `INVALID_MODEL` error for a blank model and with
    /// [`LlmError::UnsupportedProvider`] when no adapter is registered for
    /// the provider; adapter errors are returned unchanged.
    pub async fn generate(&self, prompt: impl Into<Prompt>) -> Result<LlmResponse> {
        let prompt = prompt.into();
        let provider = self.config.provider();

        if self.config.model().trim().is_empty() {
            return Err(LlmError::empty_model(provider));
        }

        let adapter = self
            .adapters
            .get(provider)
            .ok_or_else(|| LlmError::UnsupportedProvider {
                provider: provider.to_string(),
            })?;

        debug!(
            provider = %provider,
            model = %self.config.model(),
            "Dispatching generation"
        );

        adapter.generate(&prompt, &self.config).await
    }

    /// A copy of the resolved configuration.
    pub fn config(&self) -> LlmConfig {
        self.config.config()
    }

    pub fn provider(&self) -> Provider {
        self.config.provider()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llmbridge_core::diagnostics::RecordingSink;
    use llmbridge_core::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Adapter that records what it was called with.
    struct FakeAdapter {
        provider: Provider,
        calls: AtomicUsize,
        seen: Mutex<Vec<(Prompt, LlmConfig)>>,
        fail_with_status: Option<u16>,
    }

    impl FakeAdapter {
        fn new(provider: Provider) -> Self {
            FakeAdapter {
                provider,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                fail_with_status: None,
            }
        }
    }

    #[async_trait]
    impl ProviderAdapter for FakeAdapter {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn generate(&self, prompt: &Prompt, config: &ResolvedConfig) -> Result<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((prompt.clone(), config.config()));
            match self.fail_with_status {
                Some(status) => Err(LlmError::Api {
                    message: "teapot".to_string(),
                    status,
                    provider: Some(self.provider),
                    code: Some("teapot".to_string()),
                    source: None,
                }),
                None => Ok(LlmResponse::new("fake", self.provider, config.model())),
            }
        }
    }

    fn registry_with(adapter: Arc<FakeAdapter>) -> AdapterRegistry {
        let mut registry = AdapterRegistry::empty();
        registry.register(adapter);
        registry
    }

    #[test]
    fn test_default_registry_has_openai_only() {
        let registry = AdapterRegistry::default();
        assert!(registry.supports(Provider::OpenAi));
        assert!(!registry.supports(Provider::Anthropic));
        assert!(!registry.supports(Provider::Gemini));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = AdapterRegistry::empty();
        assert!(registry.register(Arc::new(FakeAdapter::new(Provider::Gemini))).is_none());
        assert!(registry.register(Arc::new(FakeAdapter::new(Provider::Gemini))).is_some());
    }

    #[tokio::test]
    async fn test_unsupported_provider_before_request() {
        for provider in [Provider::Anthropic, Provider::Gemini] {
            let llm = Llm::new(LlmConfig::new("gpt-4o").with_provider(provider));
            let err = llm.generate("hello").await.unwrap_err();

            assert_eq!(err.kind(), ErrorKind::UnsupportedProvider);
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.to_string(), format!("Provider {provider} is not supported"));
        }
    }

    #[tokio::test]
    async fn test_blank_model_rejected_before_adapter() {
        let adapter = Arc::new(FakeAdapter::new(Provider::OpenAi));
        for model in ["", "   "] {
            let llm = Llm::with_registry(LlmConfig::new(model), registry_with(adapter.clone()));
            let err = llm.generate("hello").await.unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Llm);
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.code(), Some(llmbridge_core::error::INVALID_MODEL));
        }
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_detected_stub_provider_is_unsupported() {
        let llm = Llm::new(LlmConfig::new("claude-3-5-sonnet"));
        assert_eq!(llm.provider(), Provider::Anthropic);

        let err = llm.generate("hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedProvider);
    }

    #[tokio::test]
    async fn test_routes_to_registered_adapter() {
        let adapter = Arc::new(FakeAdapter::new(Provider::Anthropic));
        let llm = Llm::with_registry(
            LlmConfig::new("claude-3-opus").with_system_prompt("sys"),
            registry_with(adapter.clone()),
        );

        let resp = llm.generate("hi").await.unwrap();
        assert_eq!(resp.content, "fake");
        assert_eq!(resp.provider, Provider::Anthropic);
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);

        let seen = adapter.seen.lock().unwrap();
        let (prompt, config) = &seen[0];
        assert_eq!(prompt, &Prompt::Text("hi".to_string()));
        assert_eq!(config.provider, Some(Provider::Anthropic));
        assert_eq!(config.timeout_ms, Some(90_000));
        assert_eq!(config.tracing_enabled, Some(true));
        assert_eq!(config.system_prompt.as_deref(), Some("sys"));
    }

    #[tokio::test]
    async fn test_adapter_errors_pass_through() {
        let mut fake = FakeAdapter::new(Provider::OpenAi);
        fake.fail_with_status = Some(418);
        let llm = Llm::with_registry(LlmConfig::new("gpt-4o"), registry_with(Arc::new(fake)));

        let err = llm.generate("hi").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Llm);
        assert_eq!(err.status_code(), 418);
        assert_eq!(err.code(), Some("teapot"));
        assert_eq!(err.to_string(), "teapot");
    }

    #[test]
    fn test_config_is_a_copy() {
        let llm = Llm::new(LlmConfig::new("gpt-4o").with_temperature(0.1));

        let mut copy = llm.config();
        copy.temperature = Some(1.9);
        copy.model = "other".to_string();

        let fresh = llm.config();
        assert_eq!(fresh.temperature, Some(0.1));
        assert_eq!(fresh.model, "gpt-4o");
        assert_eq!(fresh.provider, Some(Provider::OpenAi));
        assert_eq!(fresh.timeout_ms, Some(90_000));
        assert_eq!(fresh.tracing_enabled, Some(true));
    }

    #[test]
    fn test_detection_fallback_reported_at_construction() {
        let sink = RecordingSink::new();
        let resolved = ResolvedConfig::resolve_with(LlmConfig::new("llama-70b"), &sink);
        let llm = Llm::from_resolved(resolved, AdapterRegistry::empty());

        assert_eq!(llm.provider(), Provider::OpenAi);
        assert_eq!(sink.events().len(), 1);
    }
}
