//! llmbridge core — the provider-agnostic contract.
//!
//! This crate contains:
//! - **error**: the typed failure taxonomy (`LlmError`)
//! - **types**: providers, prompts, messages and the uniform response
//! - **config**: request configuration, defaults and loading
//! - **diagnostics**: hook for non-fatal, locally recovered conditions

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use config::{GenerateOptions, LlmConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use error::{ErrorKind, LlmError, Result};
pub use types::{
    ContentPart, ImageDetail, LlmResponse, Message, MessageContent, Prompt, Provider,
    ReasoningLevel, Role, Usage,
};
