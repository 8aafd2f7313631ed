//! Configuration — request schema, defaults, and file/env loading.
//!
//! # Usage
//! ```no_run
//! use llmbridge_core::config;
//!
//! let cfg = config::load_config(std::path::Path::new("llm.json"));
//! println!("Model: {}", cfg.model);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{apply_env_overrides, load_config};
pub use schema::{
    GenerateOptions, LlmConfig, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_MS,
    DEFAULT_TRACING_ENABLED,
};
