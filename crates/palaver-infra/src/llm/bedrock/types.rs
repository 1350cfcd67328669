//! AWS Bedrock Claude request/response types.
//!
//! Bedrock uses the Claude Messages API JSON format with two twists:
//! - The model ID goes in the URL path, not the request body.
//! - The body carries a required `anthropic_version` field instead.
//!
//! These are wire types for HTTP only; the provider-agnostic shapes live
//! in `palaver_types::llm`.

use serde::{Deserialize, Serialize};

/// Request body for Bedrock `invoke` / `invoke-with-response-stream`.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockRequest {
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub messages: Vec<BedrockMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A single message in a Bedrock Claude conversation.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockMessage {
    pub role: String,
    pub content: String,
}

/// Non-streaming response from `invoke`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvokeResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: UsagePayload,
}

/// A content block in a Claude response. Only text blocks carry data we
/// use; anything else (tool use, thinking) collapses to `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl ContentBlock {
    pub fn type_name(&self) -> &str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::Other => "other",
        }
    }
}

/// The `{"bytes":"<base64>"}` wrapper around each streamed chunk. The
/// decoded payload is a Claude SSE-style JSON event.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    pub bytes: String,
}

// ---------------------------------------------------------------------------
// Decoded stream event payloads
//
// Each decoded chunk has a "type" field naming the event. We pick the
// payload struct from that string rather than tagging an outer enum, so
// event types we don't model are cheap to skip.
// ---------------------------------------------------------------------------

/// Payload of a `message_start` event.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageStartPayload {
    pub message: MessageStartBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageStartBody {
    pub id: String,
    pub model: String,
    pub usage: Option<UsagePayload>,
}

/// Payload of a `content_block_start` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlockStartPayload {
    pub index: u32,
    pub content_block: ContentBlock,
}

/// Payload of a `content_block_delta` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlockDeltaPayload {
    pub index: u32,
    pub delta: Delta,
}

/// Delta types within a content block. Non-text deltas collapse to
/// `Other` and are dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Delta {
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

/// Payload of a `content_block_stop` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlockStopPayload {
    pub index: u32,
}

/// Payload of a `message_delta` event.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDeltaPayload {
    pub delta: MessageDeltaBody,
    #[serde(default)]
    pub usage: UsagePayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDeltaBody {
    pub stop_reason: Option<String>,
}

/// Token usage as Bedrock reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsagePayload {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// Payload of an `error` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPayload {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_omits_model() {
        let req = BedrockRequest {
            anthropic_version: "bedrock-2023-05-31".to_string(),
            max_tokens: 4096,
            messages: vec![BedrockMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            system: None,
            temperature: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(json["max_tokens"], 4096);
        // Model rides in the URL path, never the body.
        assert!(json.get("model").is_none());
        assert!(json.get("system").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_stream_chunk_wrapper_decodes() {
        let json = r#"{"bytes":"eyJ0eXBlIjoiY29udGVudF9ibG9ja19kZWx0YSJ9"}"#;
        let chunk: StreamChunk = serde_json::from_str(json).unwrap();

        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&chunk.bytes)
            .unwrap();
        assert!(String::from_utf8(decoded)
            .unwrap()
            .contains("content_block_delta"));
    }

    #[test]
    fn test_unknown_content_block_collapses_to_other() {
        let json = r#"{"type":"tool_use","id":"t1","name":"calc","input":{}}"#;
        let block: ContentBlock = serde_json::from_str(json).unwrap();
        assert!(matches!(block, ContentBlock::Other));
    }

    #[test]
    fn test_unknown_delta_collapses_to_other() {
        let json = r#"{"type":"input_json_delta","partial_json":"{"}"#;
        let delta: Delta = serde_json::from_str(json).unwrap();
        assert!(matches!(delta, Delta::Other));
    }
}
