//! Research pipeline controller.
//!
//! A [`ResearchRun`] drives one query through
//! `Planning → Searching → Writing → Notifying`, yielding an event after each
//! stage. Planner and writer failures end the stream with an error; failed
//! searches only reduce coverage. Statuses already yielded are never
//! retracted.

use crate::agents::{Notifier, Planner, Searcher, Writer};
use crate::research::domain::DomainConfig;
use crate::research::fanout::SearchFanOut;
use crate::research::overrides::with_override;
use crate::types::{AppError, ReportData, Result, Stage};
use async_stream::try_stream;
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Boxed stream of typed pipeline events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ResearchEvent>> + Send>>;

/// Boxed stream of human-readable status lines, ending with the report
pub type StatusStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// What to do when the notifier fails after the report was written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPolicy {
    /// Report the failure as a status and still deliver the report
    #[default]
    BestEffort,
    /// Abort the run with a notification failure
    Required,
}

/// Tunables for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub notification_policy: NotificationPolicy,
    /// Bound on concurrent searches; `None` launches the whole plan at once
    pub max_concurrency: Option<usize>,
    /// Per-search deadline; a search that overruns it counts as failed
    pub search_timeout: Option<Duration>,
}

/// The four capabilities a run needs
#[derive(Clone)]
pub struct Capabilities {
    pub planner: Arc<dyn Planner>,
    pub searcher: Arc<dyn Searcher>,
    pub writer: Arc<dyn Writer>,
    pub notifier: Arc<dyn Notifier>,
}

impl Capabilities {
    pub fn new(
        planner: Arc<dyn Planner>,
        searcher: Arc<dyn Searcher>,
        writer: Arc<dyn Writer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            planner,
            searcher,
            writer,
            notifier,
        }
    }
}

/// Identifier correlating the output of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTrace {
    pub id: String,
    pub started_at: DateTime<Utc>,
}

impl RunTrace {
    pub fn generate() -> Self {
        Self {
            id: format!("trace_{}", Uuid::new_v4().simple()),
            started_at: Utc::now(),
        }
    }
}

impl fmt::Display for RunTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Typed progress of a run
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchEvent {
    TraceStarted(RunTrace),
    SearchesPlanned { count: usize },
    SearchesComplete { succeeded: usize, failed: usize },
    ReportWritten,
    NotificationSent,
    NotificationFailed { error: String },
    Completed(ReportData),
}

impl ResearchEvent {
    /// Status line shown to users; for [`Completed`](Self::Completed) this
    /// is the markdown report itself
    pub fn status(&self) -> String {
        match self {
            ResearchEvent::TraceStarted(trace) => format!("View trace: {}", trace),
            ResearchEvent::SearchesPlanned { .. } => {
                "Searches planned, starting to search...".to_string()
            }
            ResearchEvent::SearchesComplete { .. } => {
                "Searches complete, writing report...".to_string()
            }
            ResearchEvent::ReportWritten => "Report written, sending email...".to_string(),
            ResearchEvent::NotificationSent => "Email sent, research complete".to_string(),
            ResearchEvent::NotificationFailed { error } => {
                format!("Email failed ({}), research complete", error)
            }
            ResearchEvent::Completed(report) => report.markdown_report.clone(),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ResearchEvent::Completed(_))
    }
}

/// A single research run
///
/// Consumed by [`events`](Self::events) or [`run`](Self::run), so one value
/// can drive only one query. Use
/// [`ResearchManager`](crate::research::ResearchManager) to start many.
pub struct ResearchRun {
    capabilities: Capabilities,
    domain: Option<Arc<DomainConfig>>,
    options: PipelineOptions,
    cancel: CancellationToken,
}

impl ResearchRun {
    pub fn new(capabilities: Capabilities, options: PipelineOptions) -> Self {
        Self {
            capabilities,
            domain: None,
            options,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_domain(mut self, domain: Option<Arc<DomainConfig>>) -> Self {
        self.domain = domain;
        self
    }

    /// Use an externally owned token to cancel the run
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this run, including all in-flight searches
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the pipeline for `query`, yielding status strings and finally the
    /// markdown report
    pub fn run(self, query: impl Into<String>) -> StatusStream {
        Box::pin(self.events(query).map(|event| event.map(|e| e.status())))
    }

    /// Run the pipeline for `query`, yielding typed events
    pub fn events(self, query: impl Into<String>) -> EventStream {
        Box::pin(self.into_stream(query.into()))
    }

    fn into_stream(self, query: String) -> impl Stream<Item = Result<ResearchEvent>> + Send {
        try_stream! {
            let ResearchRun { capabilities, domain, options, cancel } = self;
            let domain = domain.as_deref();

            let trace = RunTrace::generate();
            let span = info_span!(
                "research_run",
                trace_id = %trace.id,
                domain = domain.map(|d| d.name.as_str()).unwrap_or("default"),
            );
            span.in_scope(|| info!("View trace: {}", trace));
            yield ResearchEvent::TraceStarted(trace);

            span.in_scope(|| info!("Starting research..."));
            let plan = cancellable(
                &cancel,
                with_override(Stage::Planner, domain, |instructions| {
                    capabilities.planner.plan(&query, instructions)
                }),
            )
            .instrument(span.clone())
            .await
            .map_err(|e| stage_failure(Stage::Planner, e))?;
            yield ResearchEvent::SearchesPlanned { count: plan.len() };

            let fanout = SearchFanOut::new(Arc::clone(&capabilities.searcher))
                .with_max_concurrency(options.max_concurrency)
                .with_timeout(options.search_timeout);
            let plan_ref = &plan;
            let outcome = cancellable(
                &cancel,
                with_override(Stage::Searcher, domain, |instructions| {
                    let instructions = instructions.map(Arc::<str>::from);
                    async move { Ok(fanout.run(plan_ref, instructions).await) }
                }),
            )
            .instrument(span.clone())
            .await?;
            yield ResearchEvent::SearchesComplete {
                succeeded: outcome.succeeded(),
                failed: outcome.failed,
            };

            let report = cancellable(
                &cancel,
                with_override(Stage::Writer, domain, |instructions| {
                    capabilities.writer.write(&query, &outcome.summaries, instructions)
                }),
            )
            .instrument(span.clone())
            .await
            .map_err(|e| stage_failure(Stage::Writer, e))?;
            yield ResearchEvent::ReportWritten;

            let notified = cancellable(&cancel, capabilities.notifier.notify(&report))
                .instrument(span.clone())
                .await;
            match notified {
                Ok(()) => yield ResearchEvent::NotificationSent,
                Err(AppError::Cancelled) => Err::<(), AppError>(AppError::Cancelled)?,
                Err(e) => match options.notification_policy {
                    NotificationPolicy::Required => {
                        Err::<(), AppError>(stage_failure(Stage::Notifier, e))?
                    }
                    NotificationPolicy::BestEffort => {
                        span.in_scope(|| warn!(error = %e, "notification failed, delivering report anyway"));
                        yield ResearchEvent::NotificationFailed { error: e.to_string() };
                    }
                },
            }

            span.in_scope(|| info!("Research complete"));
            yield ResearchEvent::Completed(report);
        }
    }
}

/// Race `fut` against the run's cancellation token
async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = fut => result,
    }
}

/// Attribute an error to the stage that produced it
fn stage_failure(stage: Stage, err: AppError) -> AppError {
    match (stage, err) {
        (_, AppError::Cancelled) => AppError::Cancelled,
        (Stage::Planner, e @ AppError::Planning(_)) => e,
        (Stage::Writer, e @ AppError::Writing(_)) => e,
        (Stage::Notifier, e @ AppError::Notification(_)) => e,
        (Stage::Planner, e) => AppError::Planning(e.to_string()),
        (Stage::Writer, e) => AppError::Writing(e.to_string()),
        (Stage::Notifier, e) => AppError::Notification(e.to_string()),
        (Stage::Searcher, e) => AppError::Search(e.to_string()),
    }
}
