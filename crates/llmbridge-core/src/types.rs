//! Unified data model shared by every call site.
//!
//! Providers, prompts, messages (plain or multi-modal) and the uniform
//! response shape. Backend wire formats live next to their adapters; nothing
//! here knows how a particular vendor spells things.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────

/// The LLM backends llmbridge knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Gemini,
}

impl Provider {
    /// All providers, in detection priority order.
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "gemini" => Ok(Provider::Gemini),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────
// Reasoning effort
// ─────────────────────────────────────────────

/// Reasoning-effort hint. Adapters without effort control ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningLevel {
    None,
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningLevel::None => "none",
            ReasoningLevel::Minimal => "minimal",
            ReasoningLevel::Low => "low",
            ReasoningLevel::Medium => "medium",
            ReasoningLevel::High => "high",
        }
    }
}

impl FromStr for ReasoningLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(ReasoningLevel::None),
            "minimal" => Ok(ReasoningLevel::Minimal),
            "low" => Ok(ReasoningLevel::Low),
            "medium" => Ok(ReasoningLevel::Medium),
            "high" => Ok(ReasoningLevel::High),
            other => Err(format!("unknown reasoning level '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// Who authored a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Message {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::new(Role::System, MessageContent::Text(content.into()))
    }

    /// Create a user message with text content.
    pub fn user(content: impl Into<String>) -> Self {
        Message::new(Role::User, MessageContent::Text(content.into()))
    }

    /// Create a user message with multipart content (text, images, files).
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Message::new(Role::User, MessageContent::Parts(parts))
    }

    /// Create an assistant message with text content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::new(Role::Assistant, MessageContent::Text(content.into()))
    }
}

/// Message content — either plain text or an ordered list of typed parts.
///
/// When serialized: text becomes a plain string, parts become an array of objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// A single part of a multipart message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// Image by URL or base64 data URI.
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<ImageDetail>,
    },
    FileUrl {
        url: String,
    },
    /// A file previously uploaded to the backend.
    FileId {
        file_id: String,
    },
    /// Inline file payload.
    FileData {
        data: String,
        filename: String,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>, detail: Option<ImageDetail>) -> Self {
        ContentPart::Image {
            url: url.into(),
            detail,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Auto,
    Low,
    High,
}

impl ImageDetail {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageDetail::Auto => "auto",
            ImageDetail::Low => "low",
            ImageDetail::High => "high",
        }
    }
}

/// What the caller asks the model: a bare string (one user turn) or a
/// full conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    Text(String),
    Messages(Vec<Message>),
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<Vec<Message>> for Prompt {
    fn from(messages: Vec<Message>) -> Self {
        Prompt::Messages(messages)
    }
}

// ─────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────

/// Token accounting. `total_tokens` is always `input_tokens + output_tokens`;
/// it is wider than the counts so the sum cannot overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u64,
}

impl Usage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Usage {
            input_tokens,
            output_tokens,
            total_tokens: u64::from(input_tokens) + u64::from(output_tokens),
        }
    }
}

/// Uniform result of one generation call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    /// Generated text, possibly empty.
    pub content: String,
    pub provider: Provider,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Parsed structured output. Set only when a schema was requested and
    /// the content parsed as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>, provider: Provider, model: impl Into<String>) -> Self {
        LlmResponse {
            content: content.into(),
            provider,
            model: model.into(),
            usage: None,
            structured_output: None,
            trace_id: None,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_string_forms() {
        assert_eq!(Provider::OpenAi.to_string(), "openai");
        assert_eq!(serde_json::to_value(Provider::OpenAi).unwrap(), "openai");
        assert_eq!(serde_json::to_value(Provider::Anthropic).unwrap(), "anthropic");
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert!("mistral".parse::<Provider>().is_err());
    }

    #[test]
    fn test_reasoning_level_parse() {
        assert_eq!("minimal".parse::<ReasoningLevel>().unwrap(), ReasoningLevel::Minimal);
        assert_eq!(ReasoningLevel::High.as_str(), "high");
        assert!("extreme".parse::<ReasoningLevel>().is_err());
    }

    #[test]
    fn test_user_text_message_serialization() {
        let msg = Message::user("Hello, world!");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello, world!");
    }

    #[test]
    fn test_user_multipart_message_serialization() {
        let msg = Message::user_parts(vec![
            ContentPart::text("What's in this image?"),
            ContentPart::image("data:image/png;base64,abc123", Some(ImageDetail::High)),
            ContentPart::FileId {
                file_id: "file-42".to_string(),
            },
        ]);
        let json = serde_json::to_value(&msg).unwrap();

        let content = json["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image");
        assert_eq!(content[1]["detail"], "high");
        assert_eq!(content[2]["type"], "file_id");
        assert_eq!(content[2]["file_id"], "file-42");
    }

    #[test]
    fn test_prompt_deserialization() {
        let text: Prompt = serde_json::from_value(json!("hi")).unwrap();
        assert_eq!(text, Prompt::Text("hi".to_string()));

        let turns: Prompt = serde_json::from_value(json!([
            {"role": "system", "content": "Be terse."},
            {"role": "user", "content": [{"type": "text", "text": "2+2?"}]}
        ]))
        .unwrap();
        match turns {
            Prompt::Messages(messages) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0].role, Role::System);
                assert_eq!(
                    messages[1].content,
                    MessageContent::Parts(vec![ContentPart::text("2+2?")])
                );
            }
            _ => panic!("Expected message list"),
        }
    }

    #[test]
    fn test_usage_total_is_sum() {
        let usage = Usage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn test_usage_total_does_not_overflow() {
        let usage = Usage::new(u32::MAX, 1);
        assert_eq!(usage.total_tokens, u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_response_omits_unset_fields() {
        let resp = LlmResponse::new("4", Provider::OpenAi, "gpt-4");
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["content"], "4");
        assert_eq!(json["provider"], "openai");
        assert!(json.get("usage").is_none());
        assert!(json.get("structuredOutput").is_none());
        assert!(json.get("traceId").is_none());
    }
}
