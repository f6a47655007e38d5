//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the LLM providers that back
//! the research agents:
//! - **OpenAI**: Any OpenAI-compatible chat completions endpoint
//! - **Ollama**: Local LLM inference (requires the `ollama` feature)

use crate::types::Result;
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing the agents to swap
/// providers without changing pipeline code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including Azure OpenAI and compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    ///     temperature: 0.7,
    ///     max_tokens: 2048,
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        temperature: f32,
        max_tokens: u32,
    },

    /// Ollama local LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    /// };
    /// ```
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's cargo feature is disabled or the
    /// base URL cannot be parsed.
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                temperature,
                max_tokens,
            } => Ok(Box::new(
                super::openai::OpenAIClient::new(api_key.clone(), api_base.clone(), model.clone())
                    .with_temperature(*temperature)
                    .with_max_tokens(*max_tokens),
            )),

            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url, model.clone())?,
            )),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { model, .. } => Err(crate::types::AppError::Configuration(format!(
                "Ollama support is not compiled in (requested model '{}'). \
                 Rebuild with `--features ollama` or use an OpenAI-compatible provider.",
                model
            ))),
        }
    }

    /// Check if this provider is available in the current build
    pub fn is_implemented(&self) -> bool {
        match self {
            Provider::OpenAI { .. } => true,
            Provider::Ollama { .. } => cfg!(feature = "ollama"),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier this provider will be asked for
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}
