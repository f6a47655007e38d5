//! Search agent: runs one web search and summarizes the hits.

use crate::agents::Searcher;
use crate::llm::LLMClient;
use crate::tools::search::{format_hits, WebSearch};
use crate::types::{AppError, Result, SearchDirective, SearchSummary};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_RESULTS_PER_SEARCH: usize = 5;

const DEFAULT_INSTRUCTIONS: &str = "You are a research assistant. Given a search term, you \
    search the web for that term and produce a concise summary of the results. The summary must \
    be 2-3 paragraphs and less than 300 words. Capture the main points. Write succinctly, no need \
    to have complete sentences or good grammar. This will be consumed by someone synthesizing a \
    report, so it's vital you capture the essence and ignore any fluff. Do not include any \
    additional commentary other than the summary itself.";

/// Searcher combining a web search backend with an LLM summarizer
pub struct WebSearcher {
    llm: Arc<dyn LLMClient>,
    web: Arc<dyn WebSearch>,
    results_per_search: usize,
}

impl WebSearcher {
    pub fn new(llm: Arc<dyn LLMClient>, web: Arc<dyn WebSearch>) -> Self {
        Self {
            llm,
            web,
            results_per_search: DEFAULT_RESULTS_PER_SEARCH,
        }
    }

    pub fn with_results_per_search(mut self, results: usize) -> Self {
        self.results_per_search = results.max(1);
        self
    }

    pub fn default_instructions() -> &'static str {
        DEFAULT_INSTRUCTIONS
    }
}

#[async_trait]
impl Searcher for WebSearcher {
    async fn search(
        &self,
        directive: &SearchDirective,
        instructions: Option<&str>,
    ) -> Result<SearchSummary> {
        let hits = self
            .web
            .search(&directive.query, self.results_per_search)
            .await?;
        debug!(
            backend = self.web.name(),
            query = %directive.query,
            hits = hits.len(),
            "web search finished"
        );

        if hits.is_empty() {
            return Err(AppError::Search(format!(
                "no results for '{}'",
                directive.query
            )));
        }

        let prompt = format!(
            "Search term: {}\nReason for searching: {}\n\nSearch results:\n{}",
            directive.query,
            directive.reason,
            format_hits(&hits)
        );

        let summary = self
            .llm
            .generate_with_system(instructions.unwrap_or(DEFAULT_INSTRUCTIONS), &prompt)
            .await
            .map_err(|e| AppError::Search(e.to_string()))?;

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(AppError::Search(format!(
                "empty summary for '{}'",
                directive.query
            )));
        }

        Ok(summary.to_string())
    }
}
