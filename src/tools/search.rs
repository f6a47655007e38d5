//! Web search backend used by the search agent
//!
//! The default backend is powered by the daedra crate, which uses
//! DuckDuckGo as the search engine.

use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single hit returned by a web search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// Web search backend
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Run a search and return at most `num_results` hits
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Web search powered by daedra
pub struct DuckDuckGoSearch;

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| AppError::Search(format!("DuckDuckGo search failed: {}", e)))?;

        Ok(response
            .data
            .iter()
            .take(num_results)
            .map(|r| SearchHit {
                title: r.title.to_string(),
                url: r.url.to_string(),
                description: r.description.to_string(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

/// Render hits as a numbered plain-text list for an LLM prompt
pub fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "{}. {}\n   {}\n   {}",
                i + 1,
                hit.title,
                hit.url,
                hit.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
