//! Deep Research Pipeline
//!
//! This module turns a research query into a written report by coordinating
//! four agents: a planner, a pool of searchers, a writer and a notifier.
//!
//! # Architecture
//!
//! - [`pipeline::ResearchRun`] - Single-use controller for one query
//! - [`fanout::SearchFanOut`] - Runs the planned searches concurrently
//! - [`overrides::with_override`] - Hands a domain's stage instructions to one call
//! - [`domain::DomainConfig`] - Per-domain instructions and display metadata
//! - [`manager::ResearchManager`] - Cloneable entry point that starts runs
//!
//! # Usage
//!
//! ```ignore
//! use deep_research::research::ResearchManager;
//! use futures::StreamExt;
//!
//! let manager = ResearchManager::from_config(&config)?;
//! let domain = config.domain_registry().get("cruise");
//!
//! let mut stream = manager.run_research("Alaska cruise in June", domain);
//! while let Some(item) = stream.next().await {
//!     println!("{}", item?);
//! }
//! ```
//!
//! # Research Workflow
//!
//! 1. **Planning** - Break the query into web searches
//! 2. **Searching** - Run every search at once, keep the ones that succeed
//! 3. **Writing** - Synthesize the summaries into a markdown report
//! 4. **Notifying** - Send the report by email

/// Domain configuration and lookup.
pub mod domain;
/// Concurrent search execution.
pub mod fanout;
/// Research run entry point.
pub mod manager;
/// Per-call instruction overrides.
pub mod overrides;
/// Pipeline controller and events.
pub mod pipeline;

pub use domain::{DomainConfig, DomainRegistry, DomainUi};
pub use fanout::{FanOutOutcome, SearchFanOut, SearchProgress};
pub use manager::ResearchManager;
pub use overrides::with_override;
pub use pipeline::{
    Capabilities, EventStream, NotificationPolicy, PipelineOptions, ResearchEvent, ResearchRun,
    RunTrace, StatusStream,
};
