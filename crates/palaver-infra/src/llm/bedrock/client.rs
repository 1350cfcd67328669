//! BedrockProvider -- concrete [`LlmProvider`] for the AWS Bedrock
//! Runtime API.
//!
//! Sends requests with Bearer token authentication. Supports both
//! non-streaming (`invoke`) and streaming (`invoke-with-response-stream`)
//! modes.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::pin::Pin;
use std::time::Duration;

use futures_util::Stream;
use secrecy::{ExposeSecret, SecretString};

use palaver_core::llm::provider::LlmProvider;
use palaver_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, StreamEvent, Usage,
};

use super::streaming::create_stream;
use super::types::{BedrockMessage, BedrockRequest, ContentBlock, InvokeResponse};

/// Map an error response status to the matching [`LlmError`].
pub(crate) fn error_for_status(status: reqwest::StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        529 => LlmError::Overloaded(body),
        s if s >= 500 => LlmError::Provider {
            message: format!("server error HTTP {status}: {body}"),
        },
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

/// AWS Bedrock Claude LLM provider.
pub struct BedrockProvider {
    client: reqwest::Client,
    api_key: SecretString,
    region: String,
    model_id: String,
}

impl BedrockProvider {
    /// The Anthropic API version Bedrock expects in the request body.
    const API_VERSION: &'static str = "bedrock-2023-05-31";

    /// Create a provider for `model` in `region`, authenticating with
    /// the given bearer token.
    pub fn new(api_key: SecretString, model: String, region: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to create reqwest client");

        let model_id = Self::to_bedrock_model_id(&model, &region);

        Self {
            client,
            api_key,
            region,
            model_id,
        }
    }

    /// Convert a bare Claude model name to a Bedrock inference profile ID.
    ///
    /// Cross-region inference profiles carry a region shorthand prefix
    /// taken from the first dash-separated segment of the full AWS region
    /// (`us-east-1` gives `us.`). A model that already contains a `.`
    /// (e.g. `anthropic.claude-3-sonnet-20240229-v1:0`) is treated as
    /// fully qualified and returned unchanged.
    pub fn to_bedrock_model_id(model: &str, region: &str) -> String {
        if model.contains('.') {
            model.to_string()
        } else {
            let region_prefix = region.split('-').next().unwrap_or("us");
            format!("{region_prefix}.anthropic.{model}-v1:0")
        }
    }

    /// Full Bedrock Runtime URL for the given action.
    fn url(&self, action: &str) -> String {
        format!(
            "https://bedrock-runtime.{}.amazonaws.com/model/{}/{}",
            self.region, self.model_id, action
        )
    }

    fn to_bedrock_request(&self, request: &CompletionRequest) -> BedrockRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| BedrockMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        BedrockRequest {
            anthropic_version: Self::API_VERSION.to_string(),
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
        }
    }
}

// BedrockProvider intentionally does NOT derive Debug so the bearer
// token can never leak through formatting.

impl LlmProvider for BedrockProvider {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_bedrock_request(request);
        let url = self.url("invoke");

        tracing::debug!(url = %url, model_id = %self.model_id, "invoke request");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, "invoke rejected");
            return Err(error_for_status(status, error_body));
        }

        let invoke_resp: InvokeResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = invoke_resp
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        let stop_reason = match invoke_resp.stop_reason.as_deref() {
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        Ok(CompletionResponse {
            id: invoke_resp.id,
            content,
            model: invoke_resp.model,
            stop_reason,
            usage: Usage {
                input_tokens: invoke_resp.usage.input_tokens,
                output_tokens: invoke_resp.usage.output_tokens,
            },
        })
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let body = self.to_bedrock_request(&request);
        let url = self.url("invoke-with-response-stream");

        create_stream(&self.client, &url, body, &self.api_key)
    }
}
