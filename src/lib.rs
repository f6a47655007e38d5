//! # Deep Research
//!
//! A research pipeline that turns a natural-language query into a written
//! report. A planner agent breaks the query into web searches, the searches
//! run concurrently, a writer agent synthesizes the results and a notifier
//! emails the finished report.
//!
//! ## Overview
//!
//! Deep Research can be used in two ways:
//!
//! 1. **As a command line tool** - Run the `deep-research` binary
//! 2. **As a library** - Embed the pipeline in your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use deep_research::{ResearchConfig, ResearchManager};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ResearchConfig::load("research.toml")?;
//!     let manager = ResearchManager::from_config(&config)?;
//!
//!     let mut stream = manager.run_research("best budget laptops 2024", None);
//!     while let Some(line) = stream.next().await {
//!         println!("{}", line?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Domains
//!
//! A domain swaps the instructions of the planner, searcher and writer
//! without touching pipeline code:
//!
//! ```rust,ignore
//! let cruise = config.domain_registry().require("cruise")?;
//! let stream = manager.run_research("Alaska with a balcony cabin", Some(cruise));
//! ```
//!
//! ### Custom Agents
//!
//! Any type implementing [`agents::Planner`], [`agents::Searcher`],
//! [`agents::Writer`] or [`agents::Notifier`] can be plugged into
//! [`research::Capabilities`].
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//!
//! ## Modules
//!
//! - [`agents`] - Planner, searcher, writer and notifier agents
//! - [`llm`] - LLM client implementations
//! - [`research`] - Pipeline controller, search fan-out and domains
//! - [`tools`] - Web search backends
//! - [`types`] - Common types and error handling
//! - [`utils`] - `research.toml` configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Research agents for each pipeline stage.
pub mod agents;
/// LLM provider clients and abstractions.
pub mod llm;
/// Research pipeline orchestration.
pub mod research;
/// Web search tools.
pub mod tools;
/// Core types (plans, reports, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, Provider};
pub use research::{
    DomainConfig, DomainRegistry, NotificationPolicy, ResearchEvent, ResearchManager,
    ResearchRun,
};
pub use types::{AppError, ReportData, Result, SearchDirective, SearchPlan, Stage};
pub use utils::toml_config::{ConfigError, ResearchConfig};
