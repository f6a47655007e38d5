//! Notifier agents.
//!
//! [`EmailNotifier`] asks an LLM to turn the markdown report into an HTML
//! email and sends it through the SendGrid v3 mail API. [`LogNotifier`] is
//! used when no mail account is configured.

use crate::agents::structured::{output_contract, parse_structured};
use crate::agents::Notifier;
use crate::llm::LLMClient;
use crate::types::{AppError, ReportData, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const SENDGRID_API_BASE: &str = "https://api.sendgrid.com";

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

const INSTRUCTIONS: &str = "You are able to send a nicely formatted HTML email based on a \
    detailed report. You will be provided with a detailed report. Convert the report into clean, \
    well presented HTML and choose an appropriate subject line.";

/// Email subject and body composed by the model
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmailContent {
    /// Subject line for the email
    pub subject: String,
    /// The full report as an HTML document
    pub html_body: String,
}

/// Sends the report by email via SendGrid
pub struct EmailNotifier {
    llm: Arc<dyn LLMClient>,
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    from: String,
    to: String,
}

impl EmailNotifier {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        api_key: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            http: reqwest::Client::new(),
            api_base: SENDGRID_API_BASE.to_string(),
            api_key: api_key.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Point the notifier at a different SendGrid-compatible endpoint
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn compose(&self, report: &ReportData) -> Result<EmailContent> {
        let system = format!("{}\n\n{}", INSTRUCTIONS, output_contract::<EmailContent>());
        let response = self
            .llm
            .generate_with_system(&system, &report.markdown_report)
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        parse_structured(&response).map_err(AppError::Notification)
    }

    async fn send(&self, email: &EmailContent) -> Result<()> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": self.to }] }],
            "from": { "email": self.from },
            "subject": email.subject,
            "content": [{ "type": "text/html", "value": email.html_body }],
        });

        let response = self
            .http
            .post(format!("{}/v3/mail/send", self.api_base))
            .bearer_auth(&self.api_key)
            .timeout(SEND_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "SendGrid returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, report: &ReportData) -> Result<()> {
        info!("Writing email...");
        let email = self.compose(report).await?;
        self.send(&email).await?;
        info!(to = %self.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

/// Notifier that only logs the report summary
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, report: &ReportData) -> Result<()> {
        info!(summary = %report.short_summary, "Email delivery not configured; report logged");
        Ok(())
    }
}
