//! TOML-based configuration for the research pipeline
//!
//! This module provides declarative configuration for providers, models,
//! per-stage model selection, search tuning, email delivery and research
//! domains via a TOML file (`research.toml`).
//!
//! Secrets are never stored in the file; providers and the email section name
//! the environment variable that holds them.

use crate::llm::Provider;
use crate::research::domain::{DomainConfig, DomainRegistry};
use crate::research::pipeline::{NotificationPolicy, PipelineOptions};
use crate::types::{AppError, Stage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Root configuration structure loaded from research.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Named model configurations that reference providers
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,

    /// Which model each stage uses
    pub stages: StageModels,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Email delivery; reports are only logged when absent
    #[serde(default)]
    pub email: Option<EmailConfig>,

    /// Research domains keyed by name
    #[serde(default)]
    pub domains: HashMap<String, DomainConfig>,
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

// ============= Model Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model name/identifier to use with the provider
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

// ============= Stage Configuration =============

/// Model names (from [models]) used by each stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageModels {
    pub planner: String,
    pub searcher: String,
    pub writer: String,
    /// Falls back to the writer's model
    #[serde(default)]
    pub notifier: Option<String>,
}

impl StageModels {
    pub fn model_for(&self, stage: Stage) -> &str {
        match stage {
            Stage::Planner => &self.planner,
            Stage::Searcher => &self.searcher,
            Stage::Writer => &self.writer,
            Stage::Notifier => self.notifier.as_deref().unwrap_or(&self.writer),
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// How many searches the default planner asks for
    #[serde(default = "default_searches_per_plan")]
    pub searches_per_plan: usize,

    /// Web hits fed to the summarizer per search
    #[serde(default = "default_results_per_search")]
    pub results_per_search: usize,

    /// Upper bound on searches in flight; unbounded when absent
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Seconds before a single search is abandoned
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_searches_per_plan() -> usize {
    5
}

fn default_results_per_search() -> usize {
    5
}

fn default_search_timeout_secs() -> u64 {
    60
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            searches_per_plan: default_searches_per_plan(),
            results_per_search: default_results_per_search(),
            max_concurrency: None,
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

// ============= Pipeline Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub notification_policy: NotificationPolicy,
}

// ============= Email Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Environment variable containing the SendGrid API key
    #[serde(default = "default_sendgrid_key_env")]
    pub api_key_env: String,

    pub from: String,

    pub to: String,

    #[serde(default = "default_sendgrid_base")]
    pub api_base: String,
}

fn default_sendgrid_key_env() -> String {
    "SENDGRID_API_KEY".to_string()
}

fn default_sendgrid_base() -> String {
    crate::agents::email::SENDGRID_API_BASE.to_string()
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by model '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Model '{0}' referenced by stage '{1}' does not exist")]
    MissingModel(String, String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl FromStr for ResearchConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut config: ResearchConfig = toml::from_str(content)?;
        for (name, domain) in config.domains.iter_mut() {
            domain.name = name.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

impl ResearchConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Check cross references and domain overrides
    ///
    /// Environment variables are not checked here so that commands which do
    /// not call a model (listing domains, showing config) work without
    /// credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (model_name, model) in &self.models {
            if !self.providers.contains_key(&model.provider) {
                return Err(ConfigError::MissingProvider(
                    model.provider.clone(),
                    model_name.clone(),
                ));
            }
        }

        for stage in [Stage::Planner, Stage::Searcher, Stage::Writer, Stage::Notifier] {
            let model = self.stages.model_for(stage);
            if !self.models.contains_key(model) {
                return Err(ConfigError::MissingModel(model.to_string(), stage.to_string()));
            }
        }

        if self.search.searches_per_plan == 0 {
            return Err(ConfigError::ValidationError(
                "search.searches_per_plan must be at least 1".to_string(),
            ));
        }

        if self.search.max_concurrency == Some(0) {
            return Err(ConfigError::ValidationError(
                "search.max_concurrency must be at least 1".to_string(),
            ));
        }

        if self.search.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "search.timeout_secs must be at least 1".to_string(),
            ));
        }

        for (name, domain) in &self.domains {
            if domain.instructions.contains_key(&Stage::Notifier) {
                return Err(ConfigError::ValidationError(format!(
                    "domain '{}' overrides the notifier; only planner, searcher and writer \
                     instructions can be overridden",
                    name
                )));
            }
            if let Some((stage, _)) = domain
                .instructions
                .iter()
                .find(|(_, text)| text.trim().is_empty())
            {
                return Err(ConfigError::ValidationError(format!(
                    "domain '{}' has empty {} instructions",
                    name, stage
                )));
            }
        }

        Ok(())
    }

    /// Resolve an environment variable
    pub fn resolve_env(&self, env_name: &str) -> Result<String, ConfigError> {
        std::env::var(env_name).map_err(|_| ConfigError::MissingEnvVar(env_name.to_string()))
    }

    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }

    /// Build the concrete LLM provider for a stage
    pub fn provider_for(&self, stage: Stage) -> Result<Provider, ConfigError> {
        let model_name = self.stages.model_for(stage);
        let model = self
            .get_model(model_name)
            .ok_or_else(|| ConfigError::MissingModel(model_name.to_string(), stage.to_string()))?;
        let provider = self.get_provider(&model.provider).ok_or_else(|| {
            ConfigError::MissingProvider(model.provider.clone(), model_name.to_string())
        })?;

        Ok(match provider {
            ProviderConfig::Ollama { base_url } => Provider::Ollama {
                base_url: base_url.clone(),
                model: model.model.clone(),
            },
            ProviderConfig::OpenAI {
                api_key_env,
                api_base,
            } => Provider::OpenAI {
                api_key: self.resolve_env(api_key_env)?,
                api_base: api_base.clone(),
                model: model.model.clone(),
                temperature: model.temperature,
                max_tokens: model.max_tokens,
            },
        })
    }

    /// Domain registry built from the `[domains]` tables
    pub fn domain_registry(&self) -> DomainRegistry {
        self.domains
            .iter()
            .map(|(name, domain)| (name.clone(), domain.clone()))
            .collect()
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            notification_policy: self.pipeline.notification_policy,
            max_concurrency: self.search.max_concurrency,
            search_timeout: Some(Duration::from_secs(self.search.timeout_secs)),
        }
    }
}
