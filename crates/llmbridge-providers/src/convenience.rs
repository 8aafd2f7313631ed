//! One-shot helpers that build an [`Llm`] per call and return a single field.

use serde_json::Value;

use llmbridge_core::config::GenerateOptions;
use llmbridge_core::error::Result;
use llmbridge_core::types::Prompt;

use crate::dispatcher::{AdapterRegistry, Llm};

/// Generate text for `prompt` with `model` and return only the content.
pub async fn generate(
    model: &str,
    prompt: impl Into<Prompt>,
    options: GenerateOptions,
) -> Result<String> {
    generate_with(AdapterRegistry::default(), model, prompt, options).await
}

/// Generate structured output matching `schema` and return the parsed value.
///
/// Returns an empty object when the backend reply could not be parsed as
/// JSON: callers cannot tell that apart from a genuinely empty result.
pub async fn generate_structured(
    model: &str,
    prompt: impl Into<Prompt>,
    schema: Value,
    options: GenerateOptions,
) -> Result<Value> {
    generate_structured_with(AdapterRegistry::default(), model, prompt, schema, options).await
}

/// [`generate`] against a caller-supplied adapter table.
pub async fn generate_with(
    adapters: AdapterRegistry,
    model: &str,
    prompt: impl Into<Prompt>,
    options: GenerateOptions,
) -> Result<String> {
    let llm = Llm::with_registry(options.into_config(model), adapters);
    Ok(llm.generate(prompt).await?.content)
}

/// [`generate_structured`] against a caller-supplied adapter table.
pub async fn generate_structured_with(
    adapters: AdapterRegistry,
    model: &str,
    prompt: impl Into<Prompt>,
    schema: Value,
    options: GenerateOptions,
) -> Result<Value> {
    let config = options.into_config(model).with_schema(schema);
    let llm = Llm::with_registry(config, adapters);
    let response = llm.generate(prompt).await?;
    Ok(response
        .structured_output
        .unwrap_or_else(|| Value::Object(Default::default())))
}
