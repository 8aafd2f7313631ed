//! Configuration schema — the unit of request intent.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! Every field except `model` is optional; defaults are applied when the
//! dispatcher resolves the configuration, not here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Provider, ReasoningLevel};

/// Sampling temperature used when the caller does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Backend call timeout used when the caller does not set one.
pub const DEFAULT_TIMEOUT_MS: u64 = 90_000;
pub const DEFAULT_TRACING_ENABLED: bool = true;
/// Model used by [`LlmConfig::default`].
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

// ─────────────────────────────────────────────
// LlmConfig
// ─────────────────────────────────────────────

/// Configuration for one logical request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    /// Model identifier, e.g. `"gpt-4o"`. Must not be blank; generation
    /// rejects an empty identifier before any request is built.
    pub model: String,
    /// Explicit provider. Detected from `model` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    /// Sampling temperature (0.0 – 2.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Prepended as a system turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// JSON Schema requesting structured output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
    /// Backend call timeout in milliseconds.
    #[serde(default, rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracing_enabled: Option<bool>,
    /// Free-form key/value pairs attached to the trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_metadata: Option<HashMap<String, String>>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig::new(DEFAULT_MODEL)
    }
}

impl LlmConfig {
    /// A configuration with only the model set.
    pub fn new(model: impl Into<String>) -> Self {
        LlmConfig {
            model: model.into(),
            provider: None,
            temperature: None,
            max_tokens: None,
            top_p: None,
            system_prompt: None,
            schema: None,
            timeout_ms: None,
            reasoning: None,
            tracing_enabled: None,
            trace_metadata: None,
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_reasoning(mut self, reasoning: ReasoningLevel) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing_enabled = Some(enabled);
        self
    }

    pub fn with_trace_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.trace_metadata = Some(metadata);
        self
    }
}

// ─────────────────────────────────────────────
// GenerateOptions
// ─────────────────────────────────────────────

/// Options accepted by the convenience functions.
///
/// Same fields as [`LlmConfig`] minus `model` and `schema`, which the
/// functions take as arguments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracing_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_metadata: Option<HashMap<String, String>>,
}

impl GenerateOptions {
    /// Build `{model, ...options}`.
    pub fn into_config(self, model: impl Into<String>) -> LlmConfig {
        LlmConfig {
            model: model.into(),
            provider: self.provider,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            system_prompt: self.system_prompt,
            schema: None,
            timeout_ms: self.timeout_ms,
            reasoning: self.reasoning,
            tracing_enabled: self.tracing_enabled,
            trace_metadata: self.trace_metadata,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_config_deserialization() {
        let config: LlmConfig = serde_json::from_value(json!({"model": "gpt-4o"})).unwrap();
        assert_eq!(config, LlmConfig::new("gpt-4o"));
    }

    #[test]
    fn test_camel_case_keys() {
        let config: LlmConfig = serde_json::from_value(json!({
            "model": "claude-3-5-sonnet",
            "provider": "anthropic",
            "maxTokens": 256,
            "topP": 0.9,
            "systemPrompt": "Be brief.",
            "timeout": 5000,
            "reasoning": "low",
            "tracingEnabled": false,
            "traceMetadata": {"user": "u-1"}
        }))
        .unwrap();

        assert_eq!(config.provider, Some(Provider::Anthropic));
        assert_eq!(config.max_tokens, Some(256));
        assert_eq!(config.top_p, Some(0.9));
        assert_eq!(config.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(config.timeout_ms, Some(5000));
        assert_eq!(config.reasoning, Some(ReasoningLevel::Low));
        assert_eq!(config.tracing_enabled, Some(false));
        assert_eq!(
            config.trace_metadata.unwrap().get("user").map(String::as_str),
            Some("u-1")
        );
    }

    #[test]
    fn test_unset_fields_not_serialized() {
        let json = serde_json::to_value(LlmConfig::new("gpt-4")).unwrap();
        assert_eq!(json, json!({"model": "gpt-4"}));
    }

    #[test]
    fn test_options_into_config() {
        let options = GenerateOptions {
            temperature: Some(0.2),
            system_prompt: Some("You are terse.".to_string()),
            ..Default::default()
        };
        let config = options.into_config("gpt-4o");

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.system_prompt.as_deref(), Some("You are terse."));
        assert!(config.schema.is_none());
        assert!(config.provider.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = LlmConfig::new("gpt-4o")
            .with_temperature(1.1)
            .with_max_tokens(64)
            .with_timeout_ms(10)
            .with_tracing(false);

        assert_eq!(config.temperature, Some(1.1));
        assert_eq!(config.max_tokens, Some(64));
        assert_eq!(config.timeout_ms, Some(10));
        assert_eq!(config.tracing_enabled, Some(false));
    }
}
