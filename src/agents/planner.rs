//! Planner agent: query in, list of web searches out.

use crate::agents::structured::{output_contract, parse_structured};
use crate::agents::Planner;
use crate::llm::LLMClient;
use crate::types::{AppError, Result, SearchPlan};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Number of searches requested when not configured
pub const DEFAULT_SEARCHES_PER_PLAN: usize = 5;

/// LLM-backed planner
pub struct LlmPlanner {
    llm: Arc<dyn LLMClient>,
    searches_per_plan: usize,
}

impl LlmPlanner {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self {
            llm,
            searches_per_plan: DEFAULT_SEARCHES_PER_PLAN,
        }
    }

    pub fn with_searches_per_plan(mut self, searches: usize) -> Self {
        self.searches_per_plan = searches.max(1);
        self
    }

    /// Instructions used when no domain override is supplied
    pub fn default_instructions(&self) -> String {
        format!(
            "You are a helpful research assistant. Given a query, come up with a set of web \
             searches to perform to best answer the query. Output {} terms to query for.",
            self.searches_per_plan
        )
    }

    fn system_prompt(&self, instructions: Option<&str>) -> String {
        let instructions = instructions
            .map(str::to_string)
            .unwrap_or_else(|| self.default_instructions());
        format!("{}\n\n{}", instructions, output_contract::<SearchPlan>())
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(&self, query: &str, instructions: Option<&str>) -> Result<SearchPlan> {
        info!("Planning searches...");
        let system = self.system_prompt(instructions);
        debug!(model = self.llm.model_name(), "planner system prompt: {}", system);

        let response = self
            .llm
            .generate_with_system(&system, &format!("Query: {}", query))
            .await
            .map_err(|e| AppError::Planning(e.to_string()))?;

        let plan: SearchPlan = parse_structured(&response).map_err(AppError::Planning)?;
        if plan.is_empty() {
            return Err(AppError::Planning(
                "planner returned no searches".to_string(),
            ));
        }

        info!("Will perform {} searches", plan.len());
        Ok(plan)
    }
}
