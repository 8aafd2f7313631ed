//! OpenAI Responses API wire types.
//!
//! Only the subset llmbridge sends and reads. Unknown output item and content
//! types deserialize into catch-all variants so that shape checks happen in
//! the adapter, not in serde.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────

/// Request body for `POST /responses`.
#[derive(Clone, Debug, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextParam>,
}

/// One input turn.
#[derive(Clone, Debug, Serialize)]
pub struct InputMessage {
    pub role: &'static str,
    pub content: InputContent,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum InputContent {
    Text(String),
    Parts(Vec<InputPart>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputPart {
    InputText {
        text: String,
    },
    /// Text of a prior assistant turn.
    OutputText {
        text: String,
    },
    InputImage {
        image_url: String,
        detail: &'static str,
    },
    InputFile {
        #[serde(skip_serializing_if = "Option::is_none")]
        file_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_data: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct ReasoningParam {
    pub effort: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct TextParam {
    pub format: JsonSchemaFormat,
}

/// `text.format` directive for strict structured output.
#[derive(Clone, Debug, Serialize)]
pub struct JsonSchemaFormat {
    #[serde(rename = "type")]
    pub format_type: &'static str,
    pub name: String,
    pub schema: serde_json::Value,
    pub strict: bool,
}

// ─────────────────────────────────────────────
// Reply
// ─────────────────────────────────────────────

/// Successful reply from `POST /responses`.
#[derive(Clone, Debug, Deserialize)]
pub struct ResponsesReply {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub usage: Option<ReplyUsage>,
    /// Assigned by the tracing decorator, never by the backend.
    #[serde(skip)]
    pub trace_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText {
        text: String,
    },
    Refusal {
        refusal: String,
    },
    #[serde(other)]
    Other,
}

/// Token counts as reported. Any of them may be missing.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ReplyUsage {
    #[serde(default)]
    pub input_tokens: Option<u32>,
    #[serde(default)]
    pub output_tokens: Option<u32>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// Error body: `{"error": {"message", "type", "code"}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
