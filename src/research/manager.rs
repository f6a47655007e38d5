//! Entry point for running research queries.

use crate::agents::{
    EmailNotifier, LlmPlanner, LlmWriter, LogNotifier, Notifier, WebSearcher,
};
use crate::llm::LLMClient;
use crate::research::domain::DomainConfig;
use crate::research::pipeline::{
    Capabilities, EventStream, PipelineOptions, ResearchRun, StatusStream,
};
use crate::tools::search::{DuckDuckGoSearch, WebSearch};
use crate::types::{Result, Stage};
use crate::utils::toml_config::ResearchConfig;
use std::sync::Arc;
use tracing::info;

/// Starts independent research runs over a shared set of capabilities
///
/// Cloning is cheap. Every call to [`run_research`](Self::run_research)
/// builds a fresh [`ResearchRun`], so concurrent or repeated calls never
/// share run state.
#[derive(Clone)]
pub struct ResearchManager {
    capabilities: Capabilities,
    options: PipelineOptions,
}

impl ResearchManager {
    pub fn new(capabilities: Capabilities, options: PipelineOptions) -> Self {
        Self {
            capabilities,
            options,
        }
    }

    /// Build the LLM-backed agents described by `config`
    ///
    /// Email is sent only when an `[email]` section is present; otherwise
    /// reports are logged.
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        Self::from_config_with_search(config, Arc::new(DuckDuckGoSearch::new()))
    }

    /// Same as [`from_config`](Self::from_config) with a custom search backend
    pub fn from_config_with_search(
        config: &ResearchConfig,
        web: Arc<dyn WebSearch>,
    ) -> Result<Self> {
        let client = |stage: Stage| -> Result<Arc<dyn LLMClient>> {
            let provider = config.provider_for(stage)?;
            info!(
                stage = %stage,
                provider = provider.name(),
                model = provider.model(),
                "configured stage model"
            );
            Ok(Arc::from(provider.create_client()?))
        };

        let planner = LlmPlanner::new(client(Stage::Planner)?)
            .with_searches_per_plan(config.search.searches_per_plan);
        let searcher = WebSearcher::new(client(Stage::Searcher)?, web)
            .with_results_per_search(config.search.results_per_search);
        let writer = LlmWriter::new(client(Stage::Writer)?);

        let notifier: Arc<dyn Notifier> = match &config.email {
            Some(email) => Arc::new(
                EmailNotifier::new(
                    client(Stage::Notifier)?,
                    config.resolve_env(&email.api_key_env)?,
                    email.from.clone(),
                    email.to.clone(),
                )
                .with_api_base(email.api_base.clone()),
            ),
            None => Arc::new(LogNotifier),
        };

        Ok(Self::new(
            Capabilities::new(
                Arc::new(planner),
                Arc::new(searcher),
                Arc::new(writer),
                notifier,
            ),
            config.pipeline_options(),
        ))
    }

    /// Replace the notifier, e.g. to skip email for a single invocation
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.capabilities.notifier = notifier;
        self
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// A fresh single-use run, for callers that need its cancellation token
    pub fn new_run(&self, domain: Option<Arc<DomainConfig>>) -> ResearchRun {
        ResearchRun::new(self.capabilities.clone(), self.options).with_domain(domain)
    }

    /// Run research for `query`: status lines, then the markdown report
    pub fn run_research(
        &self,
        query: impl Into<String>,
        domain: Option<Arc<DomainConfig>>,
    ) -> StatusStream {
        self.new_run(domain).run(query)
    }

    /// Typed variant of [`run_research`](Self::run_research)
    pub fn research_events(
        &self,
        query: impl Into<String>,
        domain: Option<Arc<DomainConfig>>,
    ) -> EventStream {
        self.new_run(domain).events(query)
    }
}
