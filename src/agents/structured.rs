//! Structured (JSON) output handling for agents.
//!
//! Models are asked to answer with a JSON object matching a schema generated
//! by schemars. Replies are often wrapped in markdown fences or surrounded by
//! prose, so extraction tolerates both before handing the text to serde.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Instruction block describing the JSON shape the model must return
pub fn output_contract<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    let rendered = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Respond ONLY with a single JSON object that validates against this JSON schema:\n{}\n\
         Do not include any text before or after the JSON.",
        rendered
    )
}

/// Parse a model reply into `T`
///
/// Returns a human-readable reason on failure so callers can wrap it in the
/// stage-specific error.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("model returned an empty response".to_string());
    }

    let candidates = json_candidates(trimmed);
    if candidates.is_empty() {
        return Err(format!(
            "no JSON object found in model output: {}",
            preview(trimmed)
        ));
    }

    let mut last_error = None;
    for candidate in candidates {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some(e),
        }
    }
    Err(match last_error {
        Some(e) => format!("malformed JSON output: {}", e),
        None => "malformed JSON output".to_string(),
    })
}

/// Spans that may hold the JSON object, most specific first
///
/// A report body can carry its own code fences, so the fenced span runs to
/// the last closing fence and the outermost brace span is always tried too.
fn json_candidates(text: &str) -> Vec<&str> {
    let mut candidates = Vec::new();

    if let Some(start) = text.find("```") {
        let after_fence = &text[start + 3..];
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(end) = body.rfind("```") {
            let inner = body[..end].trim();
            if inner.starts_with('{') {
                candidates.push(inner);
            }
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start && !candidates.contains(&&text[start..=end]) {
            candidates.push(&text[start..=end]);
        }
    }

    candidates
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(MAX).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ReportData, SearchPlan};

    #[test]
    fn test_parse_bare_json() {
        let plan: SearchPlan =
            parse_structured(r#"{"searches": [{"query": "a", "reason": "b"}]}"#).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.searches[0].query, "a");
    }

    #[test]
    fn test_parse_fenced_json_with_prose() {
        let raw = "Here is the plan:\n```json\n{\"searches\": []}\n```\nGood luck!";
        let plan: SearchPlan = parse_structured(raw).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_parse_json_embedded_in_text() {
        let raw = r##"Sure! {"short_summary": "s", "markdown_report": "# Title"} done"##;
        let report: ReportData = parse_structured(raw).unwrap();
        assert_eq!(report.markdown_report, "# Title");
    }

    #[test]
    fn test_parse_fenced_report_containing_code_block() {
        let raw = "```json\n{\"short_summary\": \"s\", \"markdown_report\": \"# R\\n```rust\\nfn main() {}\\n```\\n\"}\n```";
        let report: ReportData = parse_structured(raw).unwrap();
        assert_eq!(report.markdown_report, "# R\n```rust\nfn main() {}\n```\n");
    }

    #[test]
    fn test_parse_fenced_report_followed_by_prose_fence() {
        let raw = "Report:\n```json\n{\"short_summary\": \"s\", \"markdown_report\": \"# R\"}\n```\nUse it like:\n```\nmore\n```";
        let report: ReportData = parse_structured(raw).unwrap();
        assert_eq!(report.markdown_report, "# R");
    }

    #[test]
    fn test_parse_empty_response() {
        let err = parse_structured::<SearchPlan>("   ").unwrap_err();
        assert!(err.contains("empty"));
    }

    #[test]
    fn test_parse_without_json() {
        let err = parse_structured::<SearchPlan>("I cannot help with that").unwrap_err();
        assert!(err.contains("no JSON object"));
    }

    #[test]
    fn test_parse_wrong_shape() {
        let err = parse_structured::<SearchPlan>(r#"{"queries": ["a"]}"#).unwrap_err();
        assert!(err.contains("malformed"));
    }

    #[test]
    fn test_output_contract_mentions_fields() {
        let contract = output_contract::<ReportData>();
        assert!(contract.contains("markdown_report"));
        assert!(contract.contains("follow_up_questions"));
    }
}
