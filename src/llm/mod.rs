//! LLM Provider Clients and Abstractions
//!
//! Every research agent talks to its model through the [`LLMClient`] trait,
//! so the pipeline never depends on a particular provider.
//!
//! # Supported Providers
//!
//! - `OpenAI` - any OpenAI-compatible chat completions endpoint (always built)
//! - `Ollama` - local Ollama server (enable the `ollama` feature)
//!
//! # Example
//!
//! ```ignore
//! use deep_research::llm::Provider;
//!
//! let client = Provider::Ollama {
//!     base_url: "http://localhost:11434".to_string(),
//!     model: "llama3.2".to_string(),
//! }
//! .create_client()?;
//!
//! let response = client.generate_with_system("Be terse.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// OpenAI-compatible HTTP client.
pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{LLMClient, Provider};
