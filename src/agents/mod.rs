//! Research agents
//!
//! Each pipeline stage talks to one capability through the traits below.
//! Stage instructions are passed in explicitly on every call; an agent never
//! stores a caller's override, so one agent instance can serve any number of
//! concurrent runs with different domain configurations.

pub mod email;
pub mod planner;
pub mod searcher;
pub mod structured;
pub mod writer;

use crate::types::{ReportData, Result, SearchDirective, SearchPlan, SearchSummary};
use async_trait::async_trait;

pub use email::{EmailNotifier, LogNotifier};
pub use planner::LlmPlanner;
pub use searcher::WebSearcher;
pub use writer::LlmWriter;

/// Turns a research query into a plan of web searches
#[async_trait]
pub trait Planner: Send + Sync {
    /// Plan searches for `query`, using `instructions` in place of the
    /// agent's default instructions when given
    async fn plan(&self, query: &str, instructions: Option<&str>) -> Result<SearchPlan>;
}

/// Runs one planned search and summarizes what it found
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(
        &self,
        directive: &SearchDirective,
        instructions: Option<&str>,
    ) -> Result<SearchSummary>;
}

/// Writes the final report from the collected summaries
#[async_trait]
pub trait Writer: Send + Sync {
    async fn write(
        &self,
        query: &str,
        summaries: &[SearchSummary],
        instructions: Option<&str>,
    ) -> Result<ReportData>;
}

/// Delivers a finished report
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, report: &ReportData) -> Result<()>;
}
