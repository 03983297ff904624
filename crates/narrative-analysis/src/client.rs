//! Blocking HTTP client for the analysis service.
//!
//! Calls run on the caller's thread and return once the response has been fully read, so a
//! front end can invoke them between frames without an async runtime.

use crate::convert::{analysis_report_from_response, enhancement_report_from_response};
use crate::error::{AnalysisError, remote_error_message};
use crate::wire::{AnalyzeRequest, AnalyzeResponse, EnhanceRequest, EnhanceResponse};
use narrative_core::{AnalysisBackend, AnalysisReport, EnhanceOptions, EnhancementReport};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL; endpoints are `{base_url}/analyze` and `{base_url}/enhance`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Configuration for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Replace the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of `endpoint` (e.g. `"analyze"`).
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// [`AnalysisBackend`] over HTTP + JSON.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl HttpAnalysisClient {
    /// Build a client. Fails only if the TLS backend cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn post<Req, Resp>(&self, endpoint: &str, body: &Req) -> Result<Resp, AnalysisError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!(%url, "posting to analysis service");

        let response = self.http.post(&url).json(body).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            let message = remote_error_message(status.as_u16(), &text);
            tracing::warn!(%url, status = status.as_u16(), %message, "analysis service error");
            return Err(AnalysisError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|err| {
            tracing::warn!(%url, error = %err, "unexpected response payload");
            AnalysisError::from(err)
        })
    }
}

impl AnalysisBackend for HttpAnalysisClient {
    type Error = AnalysisError;

    fn analyze(&mut self, text: &str) -> Result<AnalysisReport, Self::Error> {
        let response: AnalyzeResponse = self.post("analyze", &AnalyzeRequest { text })?;
        tracing::info!(
            issues = response.consistency_issues.len(),
            score = response.overall_score,
            "analysis finished"
        );
        analysis_report_from_response(text, response)
    }

    fn enhance(
        &mut self,
        text: &str,
        options: EnhanceOptions,
    ) -> Result<EnhancementReport, Self::Error> {
        let response: EnhanceResponse = self.post("enhance", &EnhanceRequest::new(text, options))?;
        tracing::info!(
            edits = response.edit_log.len(),
            style = %options.style,
            intensity = %options.intensity,
            "enhancement finished"
        );
        enhancement_report_from_response(response)
    }
}
