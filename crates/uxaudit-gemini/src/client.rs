//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Sends one assembled [`AnalysisRequest`], extracts the answer text from the
//! envelope and hands it to [`uxaudit_core::parse_analysis`]. Nothing is
//! retried; every failure is terminal for the attempt.

use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use serde_json::Value;
use uxaudit_core::{parse_analysis, AnalysisResult};

use crate::error::GeminiError;
use crate::request::{AnalysisRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini REST API.
///
/// The base URL is configurable so tests can point it at a mock server.
pub struct GeminiClient {
    client: Client,
    base_url: Url,
}

impl GeminiClient {
    /// Creates a client rooted at `base_url`, normally
    /// `AppConfig::gemini_base_url`.
    ///
    /// `timeout_secs` of `None` leaves the request unbounded; thinking-heavy
    /// audits routinely take well over a minute.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeminiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(base_url: &str, timeout_secs: Option<u64>) -> Result<Self, GeminiError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("uxaudit/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        // Exactly one trailing slash so `join` appends below the base path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeminiError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    pub(crate) fn endpoint(&self, model: &str) -> Result<Url, GeminiError> {
        self.base_url
            .join(&format!("v1beta/models/{model}:generateContent"))
            .map_err(|e| GeminiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends the request and returns the model's answer text, `None` when the
    /// reply carried no text.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::Http`] on network failure or timeout.
    /// - [`GeminiError::Api`] on a non-2xx status, carrying the provider's
    ///   message.
    /// - [`GeminiError::Deserialize`] if the envelope is not valid JSON.
    pub async fn generate(&self, request: &AnalysisRequest) -> Result<Option<String>, GeminiError> {
        let url = self.endpoint(&request.model)?;
        tracing::info!(model = %request.model, "dispatching audit request");
        let started = Instant::now();

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, request.credential.expose())
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            bytes = body.len(),
            "audit response received"
        );

        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let envelope: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GeminiError::Deserialize {
                context: format!("generateContent(model={})", request.model),
                source: e,
            })?;

        if let Some(reason) = envelope
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            tracing::warn!(reason, "prompt blocked by provider");
        }

        Ok(envelope.text())
    }

    /// Runs one audit: send, extract text, validate.
    ///
    /// # Errors
    ///
    /// Everything [`GeminiClient::generate`] returns, plus
    /// [`uxaudit_core::CoreError::EmptyResponse`] and
    /// [`uxaudit_core::CoreError::MalformedPayload`] wrapped in
    /// [`GeminiError::Core`].
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GeminiError> {
        let text = self.generate(request).await?;
        let result = parse_analysis(text.as_deref())?;
        tracing::info!(
            points = result.heatmap.points.len(),
            findings = result.findings.len(),
            personas = result.persona_traces.len(),
            "audit payload validated"
        );
        Ok(result)
    }
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw
/// body (or the status line when the body is empty).
fn api_error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    if let Some(message) = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return message.to_owned();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error details returned".to_owned()
    } else {
        trimmed.chars().take(500).collect()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
