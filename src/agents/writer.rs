//! Writer agent: turns search summaries into a markdown report.

use crate::agents::structured::{output_contract, parse_structured};
use crate::agents::Writer;
use crate::llm::LLMClient;
use crate::types::{AppError, ReportData, Result, SearchSummary};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const DEFAULT_INSTRUCTIONS: &str = "You are a senior researcher tasked with writing a cohesive \
    report for a research query. You will be provided with the original query, and some initial \
    research done by a research assistant.\nYou should first come up with an outline for the \
    report that describes the structure and flow of the report. Then, generate the report and \
    return that as your final output.\nThe final output should be in markdown format, and it \
    should be lengthy and detailed. Aim for 5-10 pages of content, at least 1000 words.";

/// LLM-backed report writer
pub struct LlmWriter {
    llm: Arc<dyn LLMClient>,
}

impl LlmWriter {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    pub fn default_instructions() -> &'static str {
        DEFAULT_INSTRUCTIONS
    }
}

/// Build the writer input from the query and the collected summaries
pub fn writer_input(query: &str, summaries: &[SearchSummary]) -> String {
    let results = if summaries.is_empty() {
        "(no search results were available)".to_string()
    } else {
        summaries
            .iter()
            .enumerate()
            .map(|(i, summary)| format!("[{}] {}", i + 1, summary))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!(
        "Original query: {}\nSummarized search results:\n{}",
        query, results
    )
}

#[async_trait]
impl Writer for LlmWriter {
    async fn write(
        &self,
        query: &str,
        summaries: &[SearchSummary],
        instructions: Option<&str>,
    ) -> Result<ReportData> {
        info!("Thinking about report...");
        let system = format!(
            "{}\n\n{}",
            instructions.unwrap_or(DEFAULT_INSTRUCTIONS),
            output_contract::<ReportData>()
        );

        let response = self
            .llm
            .generate_with_system(&system, &writer_input(query, summaries))
            .await
            .map_err(|e| AppError::Writing(e.to_string()))?;

        let report: ReportData = parse_structured(&response).map_err(AppError::Writing)?;
        if report.markdown_report.trim().is_empty() {
            return Err(AppError::Writing(
                "writer returned an empty report".to_string(),
            ));
        }

        info!("Finished writing report");
        Ok(report)
    }
}
