//! Shared CLI helpers — config loading, schema files, output and error formatting.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use llmbridge_core::config::{apply_env_overrides, load_config, LlmConfig};
use llmbridge_core::error::LlmError;

/// Starting configuration before command-line flags are applied.
///
/// A config file when one is given, otherwise defaults; environment
/// overrides apply either way.
pub fn base_config(path: Option<&Path>) -> LlmConfig {
    match path {
        Some(path) => load_config(path),
        None => apply_env_overrides(LlmConfig::default()),
    }
}

/// Read a JSON Schema document from disk.
pub fn read_schema(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file: {}", path.display()))?;
    let schema: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("schema file is not valid JSON: {}", path.display()))?;
    if !schema.is_object() {
        anyhow::bail!("schema file must contain a JSON object: {}", path.display());
    }
    Ok(schema)
}

/// One-line description of a failure: kind, status, provider, message.
pub fn describe_error(err: &LlmError) -> String {
    let mut out = format!("{} ({})", err.kind(), err.status_code());
    if let Some(provider) = err.provider() {
        out.push_str(&format!(" [{provider}]"));
    }
    if let Some(code) = err.code() {
        out.push_str(&format!(" code={code}"));
    }
    out.push_str(&format!(": {err}"));
    out
}

/// Print generated content to stdout.
pub fn print_response(content: &str) {
    if content.is_empty() {
        println!("{}", "(no content)".dimmed());
    } else {
        println!("{content}");
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use llmbridge_core::types::Provider;
    use std::io::Write;

    #[test]
    fn read_schema_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "object", "properties": {{"x": {{"type": "number"}}}}}}"#).unwrap();

        let schema = read_schema(file.path()).unwrap();
        assert_eq!(schema["properties"]["x"]["type"], "number");
    }

    #[test]
    fn read_schema_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_schema(file.path()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn read_schema_rejects_non_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();

        assert!(read_schema(file.path()).is_err());
    }

    #[test]
    fn read_schema_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_schema(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read schema file"));
    }

    #[test]
    fn base_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"model": "gpt-4.1", "temperature": 0.2}}"#).unwrap();

        let config = base_config(Some(file.path()));
        assert_eq!(config.temperature, Some(0.2));
    }

    #[test]
    fn describe_api_error() {
        let err = LlmError::Api {
            message: "Rate limit exceeded".to_string(),
            status: 429,
            provider: Some(Provider::OpenAi),
            code: Some("rate_limit_exceeded".to_string()),
            source: None,
        };
        assert_eq!(
            describe_error(&err),
            "LLMError (429) [openai] code=rate_limit_exceeded: Rate limit exceeded"
        );
    }

    #[test]
    fn describe_unsupported_provider() {
        let err = LlmError::UnsupportedProvider {
            provider: "gemini".to_string(),
        };
        let text = describe_error(&err);
        assert!(text.starts_with("UnsupportedProviderError (400)"));
        assert!(text.ends_with("Provider gemini is not supported"));
    }
}
