//! Mock implementations for testing.
//!
//! Scripted LLM clients, web search backends and stage agents shared by the
//! integration tests. Every mock records what it was called with so tests
//! can check which instructions reached which stage.

use async_trait::async_trait;
use deep_research::agents::{Notifier, Planner, Searcher, Writer};
use deep_research::research::{Capabilities, PipelineOptions, ResearchManager};
use deep_research::tools::search::{SearchHit, WebSearch};
use deep_research::types::{
    AppError, ReportData, Result, SearchDirective, SearchPlan, SearchSummary,
};
use deep_research::LLMClient;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============= LLM =============

/// Mock LLM client returning a fixed response and recording every call.
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    /// `(system, prompt)` pairs received so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_system(&self) -> String {
        self.calls().last().map(|(s, _)| s.clone()).unwrap_or_default()
    }

    pub fn last_prompt(&self) -> String {
        self.calls().last().map(|(_, p)| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

// ============= Web search =============

/// Web search returning canned hits
pub struct MockWebSearch {
    hits: Vec<SearchHit>,
    should_fail: bool,
}

impl MockWebSearch {
    pub fn with_hits(count: usize) -> Self {
        let hits = (1..=count)
            .map(|i| SearchHit {
                title: format!("Result {}", i),
                url: format!("https://example.com/{}", i),
                description: format!("Description of result {}", i),
            })
            .collect();
        Self {
            hits,
            should_fail: false,
        }
    }

    pub fn empty() -> Self {
        Self::with_hits(0)
    }

    pub fn failing() -> Self {
        Self {
            hits: vec![],
            should_fail: true,
        }
    }
}

#[async_trait]
impl WebSearch for MockWebSearch {
    async fn search(&self, _query: &str, num_results: usize) -> Result<Vec<SearchHit>> {
        if self.should_fail {
            return Err(AppError::Http("Mock search failure".to_string()));
        }
        Ok(self.hits.iter().take(num_results).cloned().collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============= Stage agents =============

/// Planner that derives `count` directives from the query
pub struct ScriptedPlanner {
    count: usize,
    error: Option<String>,
    delay: Duration,
    seen: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedPlanner {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            error: None,
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new(0)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `(query, instructions)` per call
    pub fn seen(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

/// Query of the `i`th (1-based) directive planned for `query`
pub fn directive_query(query: &str, i: usize) -> String {
    format!("{} / search {}", query, i)
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn plan(&self, query: &str, instructions: Option<&str>) -> Result<SearchPlan> {
        self.seen
            .lock()
            .unwrap()
            .push((query.to_string(), instructions.map(str::to_string)));
        tokio::time::sleep(self.delay).await;

        if let Some(message) = &self.error {
            return Err(AppError::Planning(message.clone()));
        }
        Ok(SearchPlan::new(
            (1..=self.count)
                .map(|i| SearchDirective::new(directive_query(query, i), format!("angle {}", i)))
                .collect(),
        ))
    }
}

/// Searcher with per-query failures and delays
#[derive(Default)]
pub struct ScriptedSearcher {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    seen: Mutex<Vec<(String, Option<String>)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    finished: AtomicUsize,
}

impl ScriptedSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, query: impl Into<String>) -> Self {
        self.failing.insert(query.into());
        self
    }

    pub fn delay_for(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(query.into(), delay);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// `(directive query, instructions)` per call, in start order
    pub fn seen(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Searches that ran to completion, successful or not
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

/// Summary text the scripted searcher produces for a directive
pub fn summary_for(query: &str) -> String {
    format!("summary of {}", query)
}

#[async_trait]
impl Searcher for ScriptedSearcher {
    async fn search(
        &self,
        directive: &SearchDirective,
        instructions: Option<&str>,
    ) -> Result<SearchSummary> {
        self.seen
            .lock()
            .unwrap()
            .push((directive.query.clone(), instructions.map(str::to_string)));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(&directive.query)
            .copied()
            .unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&directive.query) {
            return Err(AppError::Search(format!("boom: {}", directive.query)));
        }
        Ok(summary_for(&directive.query))
    }
}

/// One writer invocation
#[derive(Debug, Clone)]
pub struct WriterCall {
    pub query: String,
    pub summaries: Vec<SearchSummary>,
    pub instructions: Option<String>,
}

/// Writer producing a small markdown report and recording its input
pub struct RecordingWriter {
    error: Option<String>,
    delay: Duration,
    calls: Mutex<Vec<WriterCall>>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self {
            error: None,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<WriterCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Markdown the recording writer produces for `query`
pub fn report_for(query: &str) -> String {
    format!("# Report: {}\n\nFindings for {}.", query, query)
}

#[async_trait]
impl Writer for RecordingWriter {
    async fn write(
        &self,
        query: &str,
        summaries: &[SearchSummary],
        instructions: Option<&str>,
    ) -> Result<ReportData> {
        self.calls.lock().unwrap().push(WriterCall {
            query: query.to_string(),
            summaries: summaries.to_vec(),
            instructions: instructions.map(str::to_string),
        });
        tokio::time::sleep(self.delay).await;

        if let Some(message) = &self.error {
            return Err(AppError::Writing(message.clone()));
        }
        Ok(ReportData {
            short_summary: format!("{} sources on {}", summaries.len(), query),
            markdown_report: report_for(query),
            follow_up_questions: vec![format!("What else about {}?", query)],
        })
    }
}

/// Notifier counting deliveries, optionally failing
pub struct RecordingNotifier {
    error: Option<String>,
    sent: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            error: None,
            sent: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn attempts(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, _report: &ReportData) -> Result<()> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(message) => Err(AppError::Notification(message.clone())),
            None => Ok(()),
        }
    }
}

// ============= Wiring =============

/// Handles to the mocks behind a [`ResearchManager`]
pub struct Harness {
    pub planner: Arc<ScriptedPlanner>,
    pub searcher: Arc<ScriptedSearcher>,
    pub writer: Arc<RecordingWriter>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(
        planner: ScriptedPlanner,
        searcher: ScriptedSearcher,
        writer: RecordingWriter,
        notifier: RecordingNotifier,
    ) -> Self {
        Self {
            planner: Arc::new(planner),
            searcher: Arc::new(searcher),
            writer: Arc::new(writer),
            notifier: Arc::new(notifier),
        }
    }

    /// Everything succeeds; the planner plans `searches` directives
    pub fn happy(searches: usize) -> Self {
        Self::new(
            ScriptedPlanner::new(searches),
            ScriptedSearcher::new(),
            RecordingWriter::new(),
            RecordingNotifier::new(),
        )
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new(
            self.planner.clone(),
            self.searcher.clone(),
            self.writer.clone(),
            self.notifier.clone(),
        )
    }

    pub fn manager(&self, options: PipelineOptions) -> ResearchManager {
        ResearchManager::new(self.capabilities(), options)
    }
}
