//! HTTP client for the OpenAI Responses API and its process-wide slot.
//!
//! The adapter never builds HTTP requests itself; it talks to a
//! [`ResponsesClient`]. [`HttpResponsesClient`] is the real one,
//! [`TracedClient`] is the optional observability decorator, and
//! [`ClientSlot`] owns the lazily created instance.
//!
//! # Tracing is fixed at first use
//!
//! The slot creates its client once. Whether it is wrapped in
//! [`TracedClient`] is decided by the `tracing_enabled` flag of the call that
//! creates it; later calls reuse that client whatever their own flag says.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, error, info_span, warn, Instrument};

use llmbridge_core::error::{BoxError, LlmError, Result};
use llmbridge_core::types::Provider;

use super::wire::{ErrorEnvelope, ResponsesReply, ResponsesRequest};
use crate::registry::spec_for;

/// API base used when `OPENAI_BASE_URL` is not set.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
/// Environment variable overriding the API base.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

// ─────────────────────────────────────────────
// BackendError
// ─────────────────────────────────────────────

/// Failure reported by a [`ResponsesClient`] before normalization.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
    /// HTTP status, when the backend answered.
    pub status: Option<u16>,
    /// Backend error code (e.g. `"rate_limit_exceeded"`).
    pub code: Option<String>,
    /// The call was abandoned because the timeout expired.
    pub timed_out: bool,
    #[source]
    pub source: Option<BoxError>,
}

impl BackendError {
    /// A failure with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
            status: None,
            code: None,
            timed_out: false,
            source: None,
        }
    }

    /// The call was cancelled by the timeout.
    pub fn timeout(message: impl Into<String>) -> Self {
        BackendError {
            timed_out: true,
            ..Self::new(message)
        }
    }

    /// Transport-level failure (connect, timeout, body decode).
    pub fn from_transport(err: reqwest::Error) -> Self {
        BackendError {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
            code: None,
            timed_out: err.is_timeout(),
            source: Some(Box::new(err)),
        }
    }

    /// Non-2xx reply. Uses the `{"error": {...}}` envelope when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let (message, code) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let message = envelope
                    .error
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("HTTP {status}"));
                (message, envelope.error.code.or(envelope.error.error_type))
            }
            Err(_) if !body.trim().is_empty() => (body.trim().to_string(), None),
            Err(_) => (format!("HTTP {status}"), None),
        };
        BackendError {
            message,
            status: Some(status),
            code,
            timed_out: false,
            source: None,
        }
    }
}

// ─────────────────────────────────────────────
// ResponsesClient
// ─────────────────────────────────────────────

/// Per-call parameters that are not part of the request body.
#[derive(Clone, Debug)]
pub struct CallOptions {
    pub timeout: Duration,
    /// Attached to the trace by [`TracedClient`]; never sent to the backend.
    pub trace_metadata: Option<HashMap<String, String>>,
}

/// Capability: send one generation request, get one reply or an error.
#[async_trait]
pub trait ResponsesClient: Send + Sync {
    async fn create_response(
        &self,
        request: &ResponsesRequest,
        options: &CallOptions,
    ) -> std::result::Result<ResponsesReply, BackendError>;
}

// ─────────────────────────────────────────────
// HttpResponsesClient
// ─────────────────────────────────────────────

/// Talks to `POST {api_base}/responses` over `reqwest`.
pub struct HttpResponsesClient {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
}

impl std::fmt::Debug for HttpResponsesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponsesClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl HttpResponsesClient {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(|e| LlmError::Api {
            message: format!("Failed to build HTTP client: {e}"),
            status: 500,
            provider: Some(Provider::OpenAi),
            code: None,
            source: Some(Box::new(e)),
        })?;

        Ok(HttpResponsesClient {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
        })
    }

    /// Build the full responses URL.
    fn responses_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/responses", base)
    }
}

#[async_trait]
impl ResponsesClient for HttpResponsesClient {
    async fn create_response(
        &self,
        request: &ResponsesRequest,
        options: &CallOptions,
    ) -> std::result::Result<ResponsesReply, BackendError> {
        let url = self.responses_url();

        debug!(
            model = %request.model,
            turns = request.input.len(),
            structured = request.text.is_some(),
            timeout_ms = options.timeout.as_millis() as u64,
            "Calling OpenAI responses endpoint"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(options.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                BackendError::from_transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %error_text, "API error");
            return Err(BackendError::from_status(status.as_u16(), &error_text));
        }

        response.json::<ResponsesReply>().await.map_err(|e| {
            error!(error = %e, "Failed to parse responses reply");
            BackendError::from_transport(e)
        })
    }
}

// ─────────────────────────────────────────────
// TracedClient
// ─────────────────────────────────────────────

/// Observability decorator: runs each call inside an `llm.generation` span
/// and stamps the reply with a fresh trace id. Request and reply content are
/// passed through untouched.
pub struct TracedClient<C> {
    inner: C,
}

impl<C> TracedClient<C> {
    pub fn new(inner: C) -> Self {
        TracedClient { inner }
    }
}

#[async_trait]
impl<C: ResponsesClient> ResponsesClient for TracedClient<C> {
    async fn create_response(
        &self,
        request: &ResponsesRequest,
        options: &CallOptions,
    ) -> std::result::Result<ResponsesReply, BackendError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!(
            "llm.generation",
            trace_id = %trace_id,
            model = %request.model,
            metadata = ?options.trace_metadata
        );
        let started = Instant::now();

        let result = self
            .inner
            .create_response(request, options)
            .instrument(span.clone())
            .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(mut reply) => {
                debug!(parent: &span, latency_ms, "generation completed");
                reply.trace_id = Some(trace_id);
                Ok(reply)
            }
            Err(e) => {
                warn!(parent: &span, latency_ms, error = %e, "generation failed");
                Err(e)
            }
        }
    }
}

// ─────────────────────────────────────────────
// ClientSlot — lazily created, shared client
// ─────────────────────────────────────────────

/// Where the client gets its credentials and endpoint.
#[derive(Clone, Debug)]
pub struct ClientSettings {
    /// Explicit key; takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable read at first use when `api_key` is unset.
    pub api_key_env: String,
    pub api_base: String,
}

impl ClientSettings {
    /// `OPENAI_API_KEY` for the key, `OPENAI_BASE_URL` (or the public
    /// endpoint) for the base.
    pub fn from_env() -> Self {
        ClientSettings {
            api_key: None,
            api_key_env: spec_for(Provider::OpenAi).env_key.to_string(),
            api_base: std::env::var(BASE_URL_ENV)
                .ok()
                .filter(|base| !base.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }

    /// Settings with an explicit key and base, ignoring the environment.
    pub fn with_key(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        ClientSettings {
            api_key: Some(api_key.into()),
            api_key_env: spec_for(Provider::OpenAi).env_key.to_string(),
            api_base: api_base.into(),
        }
    }

    fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }
}

struct SlotClient {
    client: Arc<dyn ResponsesClient>,
    traced: bool,
}

/// Holds at most one client for the lifetime of the slot.
///
/// Concurrent first uses race on a `tokio::sync::OnceCell`; exactly one
/// initializer runs and every caller receives the same client.
pub struct ClientSlot {
    settings: ClientSettings,
    cell: OnceCell<SlotClient>,
}

static SHARED_SLOT: OnceLock<Arc<ClientSlot>> = OnceLock::new();

impl ClientSlot {
    pub fn new(settings: ClientSettings) -> Self {
        ClientSlot {
            settings,
            cell: OnceCell::new(),
        }
    }

    /// A slot that already holds `client`. Settings are not consulted.
    pub fn with_client(client: Arc<dyn ResponsesClient>, traced: bool) -> Self {
        ClientSlot {
            settings: ClientSettings::with_key("", DEFAULT_API_BASE),
            cell: OnceCell::new_with(Some(SlotClient { client, traced })),
        }
    }

    /// The process-wide slot, configured from the environment on first access.
    pub fn shared() -> Arc<ClientSlot> {
        SHARED_SLOT
            .get_or_init(|| Arc::new(ClientSlot::new(ClientSettings::from_env())))
            .clone()
    }

    /// Get the client, creating it on first use.
    ///
    /// Fails with [`LlmError::ApiKey`] when no key is available; nothing is
    /// sent over the network in that case. `tracing_enabled` only matters for
    /// the call that creates the client.
    pub async fn acquire(&self, tracing_enabled: bool) -> Result<Arc<dyn ResponsesClient>> {
        let slot = self
            .cell
            .get_or_try_init(|| async { self.create(tracing_enabled) })
            .await?;
        Ok(slot.client.clone())
    }

    /// Whether the client exists and, if so, whether it is traced.
    pub fn traced(&self) -> Option<bool> {
        self.cell.get().map(|slot| slot.traced)
    }

    fn create(&self, tracing_enabled: bool) -> Result<SlotClient> {
        let api_key = self.settings.resolve_api_key().ok_or_else(|| LlmError::ApiKey {
            provider: Provider::OpenAi,
            env_var: self.settings.api_key_env.clone(),
        })?;

        let http = HttpResponsesClient::new(api_key, self.settings.api_base.clone())?;
        let client: Arc<dyn ResponsesClient> = if tracing_enabled {
            Arc::new(TracedClient::new(http))
        } else {
            Arc::new(http)
        };

        debug!(
            api_base = %self.settings.api_base,
            traced = tracing_enabled,
            "Created OpenAI client"
        );

        Ok(SlotClient {
            client,
            traced: tracing_enabled,
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
