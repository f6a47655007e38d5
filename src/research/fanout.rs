//! Concurrent execution of a search plan.

use crate::agents::Searcher;
use crate::types::{AppError, SearchPlan, SearchSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Progress record emitted each time one search finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress {
    /// Searches finished so far, including this one
    pub completed: usize,
    /// Searches in the plan
    pub total: usize,
    /// Whether this search produced a summary
    pub succeeded: bool,
}

/// Result of running a whole plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutOutcome {
    /// Summaries in completion order
    pub summaries: Vec<SearchSummary>,
    /// Searches that failed and were dropped
    pub failed: usize,
}

impl FanOutOutcome {
    pub fn succeeded(&self) -> usize {
        self.summaries.len()
    }
}

/// Runs every directive of a plan as its own task
///
/// Results are consumed in completion order. A failing search is logged and
/// dropped; it never fails the batch. Dropping the future returned by
/// [`run`](Self::run) aborts every search still in flight. With a timeout
/// set, a search that overruns it counts as failed.
pub struct SearchFanOut {
    searcher: Arc<dyn Searcher>,
    max_concurrency: Option<usize>,
    timeout: Option<Duration>,
}

impl SearchFanOut {
    pub fn new(searcher: Arc<dyn Searcher>) -> Self {
        Self {
            searcher,
            max_concurrency: None,
            timeout: None,
        }
    }

    /// Cap the number of searches in flight at once; `None` runs all at once
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|n| n.max(1));
        self
    }

    /// Give up on a single search after `timeout`; the wait for a
    /// concurrency permit is not counted
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn run(&self, plan: &SearchPlan, instructions: Option<Arc<str>>) -> FanOutOutcome {
        self.run_with_progress(plan, instructions, |_| {}).await
    }

    pub async fn run_with_progress<F>(
        &self,
        plan: &SearchPlan,
        instructions: Option<Arc<str>>,
        mut on_progress: F,
    ) -> FanOutOutcome
    where
        F: FnMut(SearchProgress),
    {
        let total = plan.len();
        let mut outcome = FanOutOutcome::default();
        if total == 0 {
            return outcome;
        }

        info!("Searching...");
        let limiter = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let mut set = JoinSet::new();

        for directive in plan.searches.iter().cloned() {
            let searcher = Arc::clone(&self.searcher);
            let instructions = instructions.clone();
            let limiter = limiter.clone();
            let timeout = self.timeout;

            set.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let search = searcher.search(&directive, instructions.as_deref());
                let result = match timeout {
                    Some(limit) => tokio::time::timeout(limit, search)
                        .await
                        .unwrap_or_else(|_| {
                            Err(AppError::Search(format!("timed out after {:?}", limit)))
                        }),
                    None => search.await,
                };
                (directive, result)
            });
        }

        let mut completed = 0;
        while let Some(joined) = set.join_next().await {
            completed += 1;

            let succeeded = match joined {
                Ok((_, Ok(summary))) => {
                    outcome.summaries.push(summary);
                    true
                }
                Ok((directive, Err(e))) => {
                    warn!(query = %directive.query, error = %e, "search failed, dropping result");
                    outcome.failed += 1;
                    false
                }
                Err(e) => {
                    warn!(error = %e, "search task did not complete, dropping result");
                    outcome.failed += 1;
                    false
                }
            };

            info!("Searching... {}/{} completed", completed, total);
            on_progress(SearchProgress {
                completed,
                total,
                succeeded,
            });
        }

        info!("Finished searching");
        outcome
    }
}
