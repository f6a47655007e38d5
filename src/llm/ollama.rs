use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{
    generation::chat::{request::ChatMessageRequest, ChatMessage},
    Ollama,
};

pub struct OllamaClient {
    client: Ollama,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: String) -> Result<Self> {
        let url = reqwest::Url::parse(base_url)
            .map_err(|e| AppError::Configuration(format!("Invalid Ollama URL '{}': {}", base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Configuration(format!(
                "Ollama URL '{}' must use http or https",
                base_url
            )));
        }
        let host = format!(
            "{}://{}",
            url.scheme(),
            url.host_str().unwrap_or("localhost")
        );
        let port = url.port().unwrap_or(11434);

        Ok(Self {
            client: Ollama::builder().host(host.as_str()).port(port).build(),
            model,
        })
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatMessageRequest::new(self.model.clone(), messages);

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AppError::LLM(format!("Ollama error: {}", e)))?;

        Ok(response.message.content)
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(vec![ChatMessage::user(prompt.to_string())]).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(vec![
            ChatMessage::system(system.to_string()),
            ChatMessage::user(prompt.to_string()),
        ])
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
