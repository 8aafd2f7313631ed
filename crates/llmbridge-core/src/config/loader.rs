//! Config loader — reads a JSON request configuration and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `LlmConfig::default()`)
//! 2. JSON file at the given path
//! 3. Environment variables `LLMBRIDGE_<FIELD>` (override JSON)
//!
//! The loader never fails: unreadable or malformed files are logged and
//! replaced by defaults.

use std::path::Path;
use tracing::{debug, info, warn};

use super::schema::LlmConfig;

/// Load a configuration file and apply environment overrides.
pub fn load_config(path: &Path) -> LlmConfig {
    apply_env_overrides(load_config_from_path(path))
}

/// Load config from a file without touching the environment.
fn load_config_from_path(path: &Path) -> LlmConfig {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return LlmConfig::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return LlmConfig::default();
        }
    };

    match serde_json::from_str::<LlmConfig>(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            LlmConfig::default()
        }
    }
}

/// Apply process environment overrides on top of a loaded config.
///
/// Supported overrides:
/// - `LLMBRIDGE_MODEL` → `model`
/// - `LLMBRIDGE_PROVIDER` → `provider`
/// - `LLMBRIDGE_TIMEOUT_MS` → `timeout`
/// - `LLMBRIDGE_TRACING` → `tracingEnabled` (`true`/`1` enable, anything else disables)
pub fn apply_env_overrides(config: LlmConfig) -> LlmConfig {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

fn apply_overrides_from(
    mut config: LlmConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> LlmConfig {
    if let Some(val) = lookup("LLMBRIDGE_MODEL") {
        config.model = val;
    }
    if let Some(val) = lookup("LLMBRIDGE_PROVIDER") {
        match val.parse() {
            Ok(provider) => config.provider = Some(provider),
            Err(e) => warn!("Ignoring LLMBRIDGE_PROVIDER: {}", e),
        }
    }
    if let Some(val) = lookup("LLMBRIDGE_TIMEOUT_MS") {
        if let Ok(ms) = val.parse::<u64>() {
            config.timeout_ms = Some(ms);
        }
    }
    if let Some(val) = lookup("LLMBRIDGE_TRACING") {
        config.tracing_enabled = Some(val == "true" || val == "1");
    }
    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provider;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/llm.json"));
        assert_eq!(config, LlmConfig::default());
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(r#"{
            "model": "claude-3-5-sonnet",
            "maxTokens": 2048,
            "systemPrompt": "You are helpful."
        }"#);

        let config = load_config_from_path(file.path());
        assert_eq!(config.model, "claude-3-5-sonnet");
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.system_prompt.as_deref(), Some("You are helpful."));
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config, LlmConfig::default());
    }

    #[test]
    fn test_load_without_model_returns_defaults() {
        let file = write_temp_json(r#"{"temperature": 0.1}"#);
        let config = load_config_from_path(file.path());
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_env_override_model_and_timeout() {
        let config = apply_overrides_from(
            LlmConfig::new("gpt-4o"),
            env(&[("LLMBRIDGE_MODEL", "gemini-pro"), ("LLMBRIDGE_TIMEOUT_MS", "1200")]),
        );
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.timeout_ms, Some(1200));
    }

    #[test]
    fn test_env_override_provider() {
        let config = apply_overrides_from(
            LlmConfig::new("my-model"),
            env(&[("LLMBRIDGE_PROVIDER", "anthropic")]),
        );
        assert_eq!(config.provider, Some(Provider::Anthropic));
    }

    #[test]
    fn test_env_override_invalid_values_ignored() {
        let config = apply_overrides_from(
            LlmConfig::new("gpt-4o").with_timeout_ms(500),
            env(&[("LLMBRIDGE_PROVIDER", "mistral"), ("LLMBRIDGE_TIMEOUT_MS", "soon")]),
        );
        assert!(config.provider.is_none());
        assert_eq!(config.timeout_ms, Some(500));
    }

    #[test]
    fn test_env_override_tracing() {
        let on = apply_overrides_from(LlmConfig::default(), env(&[("LLMBRIDGE_TRACING", "1")]));
        let off = apply_overrides_from(LlmConfig::default(), env(&[("LLMBRIDGE_TRACING", "no")]));
        assert_eq!(on.tracing_enabled, Some(true));
        assert_eq!(off.tracing_enabled, Some(false));
    }
}
