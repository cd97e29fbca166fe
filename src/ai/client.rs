use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::credentials::CredentialManager;
use super::http_client::anthropic_client;
use super::prompts::{build_batch_rename_prompt, BATCH_RENAME_SYSTEM_PROMPT};
use super::proposal::parse_proposal;
use crate::config::RenamerConfig;
use crate::error::{ClientError, RenamerError};
use crate::plan::RenamePlan;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anything that can turn a file list and an instruction into a rename plan
#[async_trait]
pub trait ProposalSource: Send + Sync {
    async fn propose(&self, files: &[String], instruction: &str) -> Result<RenamePlan, RenamerError>;
}

/// Message in conversation
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

/// API request body
#[derive(Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

/// Content block in API response
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

/// API response body
#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

/// API error response
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Anthropic API client
pub struct AnthropicClient {
    config: RenamerConfig,
    api_key: String,
}

impl AnthropicClient {
    /// Create a client, resolving the API key from the environment or keychain
    pub fn new(config: RenamerConfig) -> Result<Self, ClientError> {
        let api_key = CredentialManager::get_api_key("anthropic")?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: RenamerConfig, api_key: String) -> Self {
        Self { config, api_key }
    }

    /// Send a single-turn message and return the concatenated text reply
    pub async fn send_message(&self, system_prompt: &str, user_message: &str) -> Result<String, ClientError> {
        let request = ApiRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: system_prompt.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user_message.to_string(),
            }],
        };

        let response = anthropic_client()
            .post(&self.config.api_url)
            .timeout(self.config.request_timeout())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &error_text));
        }

        let api_response: ApiResponse = response.json().await?;

        if api_response.stop_reason.as_deref() == Some("max_tokens") {
            tracing::warn!(
                max_tokens = self.config.max_tokens,
                "Response truncated at token limit"
            );
        }

        let text = collect_text(&api_response);
        if text.is_empty() {
            return Err(ClientError::EmptyResponse);
        }

        Ok(text)
    }
}

#[async_trait]
impl ProposalSource for AnthropicClient {
    async fn propose(&self, files: &[String], instruction: &str) -> Result<RenamePlan, RenamerError> {
        let user_prompt = build_batch_rename_prompt(files, instruction);

        tracing::info!(
            model = %self.config.model,
            files = files.len(),
            "Requesting rename proposal"
        );

        let response = self
            .send_message(BATCH_RENAME_SYSTEM_PROMPT, &user_prompt)
            .await?;

        tracing::debug!(chars = response.len(), "Received proposal response");

        Ok(parse_proposal(&response)?)
    }
}

fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => ClientError::Api(api_error.error.message),
        Err(_) => ClientError::Status {
            status,
            body: body.to_string(),
        },
    }
}

fn collect_text(response: &ApiResponse) -> String {
    response
        .content
        .iter()
        .filter(|block| block.content_type == "text")
        .filter_map(|block| block.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_text_skips_non_text_blocks() {
        let response: ApiResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "thinking", "thinking": "..."},
                    {"type": "text", "text": "  [{\"original\": "},
                    {"type": "text", "text": "\"a\", \"new\": \"b\"}]  "}
                ],
                "stop_reason": "end_turn"
            }"#,
        )
        .unwrap();

        assert_eq!(collect_text(&response), r#"[{"original": "a", "new": "b"}]"#);
    }

    #[test]
    fn test_api_error_uses_api_message() {
        let err = api_error(
            401,
            r#"{"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#,
        );
        assert_eq!(err.to_string(), "API error: invalid x-api-key");
    }

    #[test]
    fn test_api_error_falls_back_to_status() {
        let err = api_error(502, "Bad Gateway");
        assert!(matches!(err, ClientError::Status { status: 502, .. }));
    }

    #[test]
    fn test_request_shape() {
        let request = ApiRequest {
            model: "m".to_string(),
            max_tokens: 10,
            system: "s".to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 10);
    }
}
