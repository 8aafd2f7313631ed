//! OpenAI adapter — uniform config + prompt in, uniform response or typed
//! error out.
//!
//! Pipeline for one call:
//! 1. acquire the shared client (fails fast without an API key)
//! 2. build the Responses request (turns, sampling, reasoning, strict schema)
//! 3. one backend call bounded by the resolved timeout
//! 4. extract the text of the first message item (any other shape is an error)
//! 5. parse structured output when a schema was requested (failure is non-fatal)
//! 6. map usage, attach the trace id
//!
//! No retries happen here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use llmbridge_core::config::DEFAULT_TEMPERATURE;
use llmbridge_core::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use llmbridge_core::error::{LlmError, Result};
use llmbridge_core::types::{
    ContentPart, ImageDetail, LlmResponse, Message, MessageContent, Prompt, Provider, Role, Usage,
};

use super::client::{BackendError, CallOptions, ClientSlot};
use super::schema::{format_name, to_strict_schema};
use super::wire::{
    InputContent, InputMessage, InputPart, JsonSchemaFormat, OutputContent, OutputItem,
    ReasoningParam, ReplyUsage, ResponsesReply, ResponsesRequest, TextParam,
};
use crate::resolve::ResolvedConfig;
use crate::traits::ProviderAdapter;

/// Message used when the backend error carries no text.
const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Adapter for the OpenAI Responses API.
pub struct OpenAiAdapter {
    slot: Arc<ClientSlot>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl OpenAiAdapter {
    pub fn new(slot: Arc<ClientSlot>) -> Self {
        OpenAiAdapter {
            slot,
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Adapter bound to the process-wide client slot.
    pub fn shared() -> Self {
        Self::new(ClientSlot::shared())
    }

    /// Report structured-output parse failures to `sink`.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    fn assemble(&self, reply: ResponsesReply, config: &ResolvedConfig) -> Result<LlmResponse> {
        let content = extract_text(&reply)?;

        let mut response = LlmResponse::new(content, Provider::OpenAi, config.model());
        response.usage = reply.usage.and_then(map_usage);
        response.trace_id = reply.trace_id;

        if config.as_config().schema.is_some() {
            match serde_json::from_str::<serde_json::Value>(&response.content) {
                Ok(parsed) => response.structured_output = Some(parsed),
                Err(e) => self.diagnostics.emit(Diagnostic::StructuredOutputParse {
                    provider: Provider::OpenAi,
                    model: config.model().to_string(),
                    error: e.to_string(),
                }),
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate(&self, prompt: &Prompt, config: &ResolvedConfig) -> Result<LlmResponse> {
        let client = self.slot.acquire(config.tracing_enabled()).await?;

        let request = build_request(prompt, config);
        let options = CallOptions {
            timeout: config.timeout(),
            trace_metadata: config.as_config().trace_metadata.clone(),
        };

        let reply = client
            .create_response(&request, &options)
            .await
            .map_err(|e| normalize_error(e, config))?;

        let response = self.assemble(reply, config)?;
        debug!(
            provider = %response.provider,
            model = %response.model,
            content_len = response.content.len(),
            structured = response.structured_output.is_some(),
            "LLM response received"
        );
        Ok(response)
    }
}

// ─────────────────────────────────────────────
// Request construction
// ─────────────────────────────────────────────

/// Build the Responses request for `prompt` under `config`.
///
/// Turn order: the system prompt (if any), then the prompt's turns unchanged.
pub fn build_request(prompt: &Prompt, config: &ResolvedConfig) -> ResponsesRequest {
    let cfg = config.as_config();

    let mut input = Vec::new();
    if let Some(system) = &cfg.system_prompt {
        input.push(InputMessage {
            role: Role::System.as_str(),
            content: InputContent::Text(system.clone()),
        });
    }
    match prompt {
        Prompt::Text(text) => input.push(InputMessage {
            role: Role::User.as_str(),
            content: InputContent::Text(text.clone()),
        }),
        Prompt::Messages(messages) => input.extend(messages.iter().map(to_input_message)),
    }

    let text = cfg.schema.as_ref().map(|schema| TextParam {
        format: JsonSchemaFormat {
            format_type: "json_schema",
            name: format_name(schema),
            schema: to_strict_schema(schema),
            strict: true,
        },
    });

    ResponsesRequest {
        model: cfg.model.clone(),
        input,
        temperature: cfg.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        top_p: cfg.top_p,
        max_output_tokens: cfg.max_tokens,
        reasoning: cfg.reasoning.map(|level| ReasoningParam {
            effort: level.as_str(),
        }),
        text,
    }
}

fn to_input_message(message: &Message) -> InputMessage {
    let content = match &message.content {
        MessageContent::Text(text) => InputContent::Text(text.clone()),
        MessageContent::Parts(parts) => InputContent::Parts(
            parts
                .iter()
                .map(|part| to_input_part(part, message.role))
                .collect(),
        ),
    };
    InputMessage {
        role: message.role.as_str(),
        content,
    }
}

fn to_input_part(part: &ContentPart, role: Role) -> InputPart {
    match part {
        ContentPart::Text { text } if role == Role::Assistant => {
            InputPart::OutputText { text: text.clone() }
        }
        ContentPart::Text { text } => InputPart::InputText { text: text.clone() },
        ContentPart::Image { url, detail } => InputPart::InputImage {
            image_url: url.clone(),
            detail: detail.unwrap_or(ImageDetail::Auto).as_str(),
        },
        ContentPart::FileUrl { url } => InputPart::InputFile {
            file_url: Some(url.clone()),
            file_id: None,
            file_data: None,
            filename: None,
        },
        ContentPart::FileId { file_id } => InputPart::InputFile {
            file_url: None,
            file_id: Some(file_id.clone()),
            file_data: None,
            filename: None,
        },
        ContentPart::FileData { data, filename } => InputPart::InputFile {
            file_url: None,
            file_id: None,
            file_data: Some(data.clone()),
            filename: Some(filename.clone()),
        },
    }
}

// ─────────────────────────────────────────────
// Response normalization
// ─────────────────────────────────────────────

/// Text of the first output item, which must be a message whose first
/// content part is `output_text`.
fn extract_text(reply: &ResponsesReply) -> Result<String> {
    match reply.output.first() {
        Some(OutputItem::Message { content }) => match content.first() {
            Some(OutputContent::OutputText { text }) => Ok(text.clone()),
            _ => Err(LlmError::unsupported_response_format(Provider::OpenAi)),
        },
        _ => Err(LlmError::unsupported_response_format(Provider::OpenAi)),
    }
}

/// Usage is only reported when both counts are present.
fn map_usage(usage: ReplyUsage) -> Option<Usage> {
    let (Some(input), Some(output)) = (usage.input_tokens, usage.output_tokens) else {
        debug!(?usage, "Incomplete usage block, leaving usage unset");
        return None;
    };
    let mapped = Usage::new(input, output);
    if let Some(reported) = usage.total_tokens {
        if reported != mapped.total_tokens {
            debug!(
                reported,
                computed = mapped.total_tokens,
                "Backend total_tokens disagrees with input + output, using the sum"
            );
        }
    }
    Some(mapped)
}

/// Classify a backend failure: timeouts become [`LlmError::Timeout`],
/// everything else the generic kind with the backend's status (or 500).
fn normalize_error(err: BackendError, config: &ResolvedConfig) -> LlmError {
    if err.timed_out {
        return LlmError::Timeout {
            provider: Some(Provider::OpenAi),
            timeout_ms: config.timeout_ms(),
        };
    }

    let message = if err.message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        err.message.clone()
    };
    LlmError::Api {
        message,
        status: err.status.unwrap_or(500),
        provider: Some(Provider::OpenAi),
        code: err.code.clone(),
        source: Some(Box::new(err)),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
