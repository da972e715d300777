use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::types::{Reasoning, ResponsesEnvelope, ResponsesRequest, Tool};
use crate::config::GraderConfig;
use crate::models::{Verdict, VerdictParseError};

/// Bytes of an error body kept for the log line.
const BODY_SNIPPET_LEN: usize = 200;

#[derive(Debug, Error)]
pub enum VerdictError {
    #[error("no OPENAI_KEY / OPENAI_API_KEY set")]
    MissingApiKey,

    #[error("request timed out")]
    Timeout,

    #[error("request failed (status {status}): {snippet}")]
    Status { status: StatusCode, snippet: String },

    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("unexpected response envelope: {0}")]
    Envelope(String),

    #[error("unusable verdict: {0}")]
    Verdict(#[from] VerdictParseError),
}

impl VerdictError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            VerdictError::MissingApiKey => "missing_api_key",
            VerdictError::Timeout => "timeout",
            VerdictError::Status { .. } => "status",
            VerdictError::Http(_) => "http",
            VerdictError::Envelope(_) => "envelope",
            VerdictError::Verdict(_) => "verdict",
        }
    }
}

impl From<reqwest::Error> for VerdictError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VerdictError::Timeout
        } else {
            VerdictError::Http(e)
        }
    }
}

/// Anything that can judge whether a pick won.
#[async_trait]
pub trait VerdictRequester: Send + Sync {
    async fn request_verdict(
        &self,
        week: u32,
        pick: &str,
        scoreboard_url: &str,
    ) -> Result<Verdict, VerdictError>;
}

/// Client for the OpenAI Responses endpoint with web search enabled.
#[derive(Debug, Clone)]
pub struct ResponsesClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    reasoning_effort: String,
}

impl ResponsesClient {
    pub fn new(config: &GraderConfig) -> Result<Self, VerdictError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(VerdictError::Http)?;

        Ok(Self {
            http,
            base_url: config.openai_api_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            reasoning_effort: config.reasoning_effort.clone(),
        })
    }

    fn build_request(&self, prompt: String) -> ResponsesRequest {
        ResponsesRequest {
            model: self.model.clone(),
            reasoning: Reasoning {
                effort: self.reasoning_effort.clone(),
            },
            tools: vec![Tool::web_search()],
            input: prompt,
        }
    }
}

#[async_trait]
impl VerdictRequester for ResponsesClient {
    async fn request_verdict(
        &self,
        week: u32,
        pick: &str,
        scoreboard_url: &str,
    ) -> Result<Verdict, VerdictError> {
        let api_key = self.api_key.as_deref().ok_or(VerdictError::MissingApiKey)?;

        let url = format!("{}/responses", self.base_url);
        let body = self.build_request(grading_prompt(week, pick, scoreboard_url));

        tracing::debug!(week, pick, model = %self.model, "Requesting verdict");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(VerdictError::Status {
                status,
                snippet: truncate(&text, BODY_SNIPPET_LEN).to_string(),
            });
        }

        let envelope: ResponsesEnvelope =
            serde_json::from_str(&text).map_err(|e| VerdictError::Envelope(e.to_string()))?;
        let answer = envelope
            .first_text()
            .ok_or_else(|| VerdictError::Envelope("no output text".into()))?;

        Ok(Verdict::parse(answer)?)
    }
}

/// Question put to the model for a single pick.
pub fn grading_prompt(week: u32, pick: &str, scoreboard_url: &str) -> String {
    format!(
        "Based on any of these box scores for Week #{week} of the NFL season: {scoreboard_url} \
         Did this bet win? {pick} \
         Please respond only with JSON {{\"result\": true | false | \"pending\", \"rationale\": \"...\"}}. \
         Use \"pending\" if the game has not finished."
    )
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
