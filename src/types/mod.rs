use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============= Stage Types =============

/// One of the pipeline stages that can run under a domain override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Planner,
    Searcher,
    Writer,
    Notifier,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planner => "planner",
            Stage::Searcher => "searcher",
            Stage::Writer => "writer",
            Stage::Notifier => "notifier",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============= Planning Types =============

/// A single web search the planner wants performed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchDirective {
    /// The search term to use for the web search
    pub query: String,
    /// Your reasoning for why this search is important to the query
    pub reason: String,
}

impl SearchDirective {
    pub fn new(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            reason: reason.into(),
        }
    }
}

/// Ordered list of searches produced by the planner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchPlan {
    /// A list of web searches to perform to best answer the query
    pub searches: Vec<SearchDirective>,
}

impl SearchPlan {
    pub fn new(searches: Vec<SearchDirective>) -> Self {
        Self { searches }
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}

/// Text produced by a single successful search
pub type SearchSummary = String;

// ============= Report Types =============

/// Structured report produced by the writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportData {
    /// A short 2-3 sentence summary of the findings
    pub short_summary: String,
    /// The final report, in markdown
    pub markdown_report: String,
    /// Suggested topics to research further
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Planning failed: {0}")]
    Planning(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Writing failed: {0}")]
    Writing(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Research run cancelled")]
    Cancelled,

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
