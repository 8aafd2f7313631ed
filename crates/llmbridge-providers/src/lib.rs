//! LLM provider layer for llmbridge.
//!
//! One request/response contract over several vendor APIs.
//!
//! # Architecture
//!
//! - [`registry`] — static provider specs and model-name detection
//! - [`resolve::ResolvedConfig`] — config merged with defaults and the detected provider
//! - [`traits::ProviderAdapter`] — trait each backend implements
//! - [`openai`] — the OpenAI Responses API adapter
//! - [`dispatcher::Llm`] — facade routing `generate` calls through an adapter table
//! - [`convenience`] — `generate` / `generate_structured` one-shot helpers

pub mod convenience;
pub mod dispatcher;
pub mod openai;
pub mod registry;
pub mod resolve;
pub mod traits;

// Re-export main types for convenience
pub use convenience::{generate, generate_structured};
pub use dispatcher::{AdapterRegistry, Llm};
pub use openai::OpenAiAdapter;
pub use registry::{detect_provider, detect_provider_with, ProviderSpec, PROVIDERS};
pub use resolve::ResolvedConfig;
pub use traits::ProviderAdapter;
