//! Completion collaborator
//!
//! LLM nodes hand their joined inputs to a [`CompletionClient`]. The only
//! production implementation talks to a Mistral/OpenAI-compatible
//! `/chat/completions` endpoint; tests script their own.

pub mod mistral;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

pub use mistral::MistralClient;

/// Errors returned by a completion backend
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The HTTP call failed or exceeded its deadline
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The backend answered without any choice
    #[error("no choices in response")]
    NoChoices,
}

/// A function the model may call, in chat-completions tool format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// A function taking a single string `input` argument
    pub fn function(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "input": {
                            "type": "string",
                            "description": "Input data for the tool"
                        }
                    }
                }),
            },
        }
    }
}

/// One prompt to complete
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: Option<f64>,
    pub tools: Vec<ToolDefinition>,
    /// The call fails once this much time has passed
    pub deadline: Duration,
}

/// A text-completion backend
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
