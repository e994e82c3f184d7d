//! Mistral chat-completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, CompletionError, CompletionRequest, ToolDefinition};

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_MODEL: &str = "mistral-small-latest";

/// HTTP client for a Mistral/OpenAI-compatible completion API
#[derive(Debug, Clone)]
pub struct MistralClient {
    /// Base URL without trailing slash (e.g., "https://api.mistral.ai/v1")
    base_url: String,
    api_key: String,
    client: Client,
}

impl MistralClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl CompletionClient for MistralClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
            tools: &request.tools,
            temperature: request.temperature,
        };

        tracing::debug!(
            "Sending completion request (model: {}, tools: {})",
            request.model,
            request.tools.len()
        );

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(&self.api_key)
            .timeout(request.deadline)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
