//! HTTP client for the field-detection service.

use std::time::Duration;

use canvas::detect::{self, DetectError, DetectionRequest};
use canvas::doc::FieldDefinition;
use serde::Deserialize;

use crate::config::Timeouts;

const DETECT_PATH: &str = "/api/detect-fields";
const CONFIG_PATH: &str = "/api/detect-fields/config";

#[derive(Debug, Deserialize)]
struct Availability {
    #[serde(default)]
    available: bool,
}

pub struct DetectClient {
    http: reqwest::Client,
    base_url: String,
}

impl DetectClient {
    /// # Errors
    ///
    /// Returns `DetectError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, DetectError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| DetectError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ask the service whether detection is configured.
    ///
    /// # Errors
    ///
    /// `Transport` when the request fails, `Status` for non-2xx, `Parse` for bad JSON.
    pub async fn is_available(&self) -> Result<bool, DetectError> {
        let (status, body) = self.send(self.http.get(self.url(CONFIG_PATH))).await?;
        check_status(status, &body)?;
        let availability: Availability = serde_json::from_str(&body)?;
        Ok(availability.available)
    }

    /// Send page rasters and return sanitized fields.
    ///
    /// # Errors
    ///
    /// Transport, HTTP status, service-reported and parse failures.
    pub async fn detect(&self, request: &DetectionRequest) -> Result<Vec<FieldDefinition>, DetectError> {
        tracing::info!(pages = request.pages.len(), url = %self.url(DETECT_PATH), "requesting field detection");
        let (status, body) = self.send(self.http.post(self.url(DETECT_PATH)).json(request)).await?;
        interpret_detection(status, &body, request)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), DetectError> {
        let response = request.send().await.map_err(|e| DetectError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| DetectError::Transport(e.to_string()))?;
        Ok((status, body))
    }
}

fn check_status(status: u16, body: &str) -> Result<(), DetectError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = detect::error_message(body).unwrap_or_else(|| format!("Detection API error: {status}"));
    Err(DetectError::Status { status, message })
}

/// Turn a raw response into fields: status check, decode, sanitize.
fn interpret_detection(status: u16, body: &str, request: &DetectionRequest) -> Result<Vec<FieldDefinition>, DetectError> {
    check_status(status, body)?;
    let candidates = detect::parse_response(body)?;
    let fields = detect::sanitize(&candidates, request);
    tracing::info!(candidates = candidates.len(), accepted = fields.len(), "detection finished");
    Ok(fields)
}

#[cfg(test)]
#[path = "detect_client_test.rs"]
mod tests;
