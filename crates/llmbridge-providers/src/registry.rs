//! Provider registry — static specs for the supported backends and the
//! model-name heuristics used to pick one.
//!
//! Model names are free text and there is no authoritative catalogue, so
//! detection is substring matching on the lowercased identifier. Unknown
//! names fall back to OpenAI with a diagnostic; detection never fails.

use llmbridge_core::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use llmbridge_core::types::Provider;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    pub provider: Provider,
    /// Internal name (e.g. `"openai"`).
    pub name: &'static str,
    /// Human-readable name for logs.
    pub display_name: &'static str,
    /// Markers to look for in lowercased model names.
    pub keywords: &'static [&'static str],
    /// Environment variable holding the API key.
    pub env_key: &'static str,
}

/// Supported providers, in detection priority order.
pub static PROVIDERS: &[ProviderSpec] = &[
    // OpenAI first: an identifier carrying both an OpenAI marker and another
    // family's marker resolves to OpenAI.
    ProviderSpec {
        provider: Provider::OpenAi,
        name: "openai",
        display_name: "OpenAI",
        keywords: &[
            "gpt",
            "chatgpt",
            "o1",
            "o3",
            "o4",
            "davinci",
            "curie",
            "babbage",
            "text-embedding",
            "dall-e",
            "whisper",
            "tts-",
        ],
        env_key: "OPENAI_API_KEY",
    },
    ProviderSpec {
        provider: Provider::Anthropic,
        name: "anthropic",
        display_name: "Anthropic",
        keywords: &["claude", "anthropic"],
        env_key: "ANTHROPIC_API_KEY",
    },
    ProviderSpec {
        provider: Provider::Gemini,
        name: "gemini",
        display_name: "Gemini",
        keywords: &["gemini", "palm", "bison", "gecko"],
        env_key: "GEMINI_API_KEY",
    },
];

/// Provider used when no marker matches.
pub const FALLBACK_PROVIDER: Provider = Provider::OpenAi;

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// The spec for a provider.
pub fn spec_for(provider: Provider) -> &'static ProviderSpec {
    match provider {
        Provider::OpenAi => &PROVIDERS[0],
        Provider::Anthropic => &PROVIDERS[1],
        Provider::Gemini => &PROVIDERS[2],
    }
}

/// Find a provider spec by matching keywords against a model name.
pub fn find_by_model(model: &str) -> Option<&'static ProviderSpec> {
    let model_lower = model.to_lowercase();
    PROVIDERS
        .iter()
        .find(|spec| spec.keywords.iter().any(|kw| model_lower.contains(kw)))
}

/// Detect the provider for a model identifier.
///
/// Total and case-insensitive. Unknown names resolve to OpenAI and emit a
/// [`Diagnostic::ProviderFallback`] through the default tracing sink.
pub fn detect_provider(model: &str) -> Provider {
    detect_provider_with(model, &TracingSink)
}

/// [`detect_provider`] reporting the fallback through `sink`.
pub fn detect_provider_with(model: &str, sink: &dyn DiagnosticSink) -> Provider {
    match find_by_model(model) {
        Some(spec) => spec.provider,
        None => {
            sink.emit(Diagnostic::ProviderFallback {
                model: model.to_string(),
                fallback: FALLBACK_PROVIDER,
            });
            FALLBACK_PROVIDER
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
