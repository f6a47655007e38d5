use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for OpenAI-compatible `/chat/completions` endpoints
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            temperature: 0.7,
            max_tokens: 2048,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Deadline for one completion request, including the response body
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn complete(&self, messages: Vec<ChatMessage<'_>>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "OpenAI API returned {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Failed to parse OpenAI response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(vec![ChatMessage {
            role: "user",
            content: prompt,
        }])
        .await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.complete(vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ])
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
