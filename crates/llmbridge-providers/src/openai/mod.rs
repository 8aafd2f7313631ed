//! OpenAI backend — the Responses API adapter.
//!
//! - [`client`] — HTTP client, tracing decorator and the shared client slot
//! - [`wire`] — request/reply bodies
//! - [`schema`] — strict-mode schema normalization
//! - [`adapter`] — [`OpenAiAdapter`], the [`ProviderAdapter`](crate::ProviderAdapter) implementation

pub mod adapter;
pub mod client;
pub mod schema;
pub mod wire;

pub use adapter::{build_request, OpenAiAdapter};
pub use client::{
    BackendError, CallOptions, ClientSettings, ClientSlot, HttpResponsesClient, ResponsesClient,
    TracedClient,
};
pub use schema::to_strict_schema;
