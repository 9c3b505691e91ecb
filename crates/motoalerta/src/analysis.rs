//! AI hotspot analysis for motoalerta.
//!
//! This module sends the open (stolen) incident set to a remote
//! text-generation service and returns its free-text hotspot summary.
//! The service call is a single `generateContent` POST; every transport
//! or service failure collapses into one generic error, with the detail
//! kept in the logs.

use serde_json::json;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::incident::IncidentRecord;

/// Message returned when there is nothing to analyze.
pub const NO_DATA_MESSAGE: &str = "There are no open theft reports to analyze.";

/// Client for the remote analysis service.
#[derive(Debug)]
pub struct TheftAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl TheftAnalyzer {
    /// Create an analyzer for the given service endpoint and model.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    /// The `generateContent` URL for the configured endpoint and model.
    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Summarize theft patterns across the given open incidents.
    ///
    /// An empty set short-circuits to a fixed message without touching the
    /// network. A missing API key fails before any network attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] when no credential is configured,
    /// or [`Error::AnalysisUnavailable`] for any service failure.
    pub async fn summarize(&self, open_incidents: &[&IncidentRecord]) -> Result<String> {
        if open_incidents.is_empty() {
            return Ok(NO_DATA_MESSAGE.to_string());
        }

        let Some(api_key) = &self.api_key else {
            return Err(Error::MissingApiKey);
        };

        let prompt = build_prompt(open_incidents)?;
        debug!(
            "Requesting analysis of {} incidents from model {}",
            open_incidents.len(),
            self.model
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        // The credential rides in a header, never in the URL: transport
        // errors echo the URL into the logs.
        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                error!("Analysis request failed: {err}");
                Error::AnalysisUnavailable
            })?;

        let payload: serde_json::Value = response.json().await.map_err(|err| {
            error!("Unreadable analysis response: {err}");
            Error::AnalysisUnavailable
        })?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!("Analysis response carried no text candidate");
                Error::AnalysisUnavailable
            })
    }
}

/// Build the fixed-template analysis prompt.
///
/// Incidents are embedded as structured JSON carrying only the plate, the
/// theft date, and the theft coordinates.
fn build_prompt(incidents: &[&IncidentRecord]) -> Result<String> {
    let theft_data: Vec<serde_json::Value> = incidents
        .iter()
        .map(|record| {
            json!({
                "plate": record.plate,
                "date": record.theft_date.to_rfc3339(),
                "latitude": record.theft_location.latitude,
                "longitude": record.theft_location.longitude,
            })
        })
        .collect();
    let data = serde_json::to_string_pretty(&theft_data)?;

    Ok(format!(
        "You are a security analyst specializing in criminology.\n\
         Based on the following motorcycle theft reports in JSON format, analyze and \
         describe patterns, identify the highest-risk zones (hotspots), and suggest \
         likely critical time windows.\n\
         Provide a concise, clear summary useful to authorities and citizens.\n\
         Do not include the input JSON in your answer. Reply with the plain-text \
         analysis only.\n\n\
         Data:\n{data}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::Location;

    fn test_record(plate: &str) -> IncidentRecord {
        IncidentRecord::new(plate, Location::new(4.60971, -74.08175)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_set_short_circuits() {
        // Endpoint is unroutable: proof the empty case never goes near it.
        let analyzer = TheftAnalyzer::new("http://127.0.0.1:1", "test-model", None);
        let summary = analyzer.summarize(&[]).await.unwrap();
        assert_eq!(summary, NO_DATA_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let analyzer = TheftAnalyzer::new("http://127.0.0.1:1", "test-model", None);
        let record = test_record("ABC123");

        let result = analyzer.summarize(&[&record]).await;
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_generic_failure() {
        let analyzer = TheftAnalyzer::new(
            "http://127.0.0.1:1",
            "test-model",
            Some("test-key".to_string()),
        );
        let record = test_record("ABC123");

        let result = analyzer.summarize(&[&record]).await;
        assert!(matches!(result, Err(Error::AnalysisUnavailable)));
    }

    #[test]
    fn test_request_url_carries_no_credential() {
        let analyzer = TheftAnalyzer::new(
            "https://example.test/v1beta/",
            "test-model",
            Some("sk-secret".to_string()),
        );
        let url = analyzer.request_url();

        assert_eq!(
            url,
            "https://example.test/v1beta/models/test-model:generateContent"
        );
        assert!(!url.contains("sk-secret"));
        assert!(!url.contains("key="));
    }

    #[test]
    fn test_prompt_embeds_incident_data() {
        let record = test_record("ABC123");
        let prompt = build_prompt(&[&record]).unwrap();

        assert!(prompt.contains("ABC123"));
        assert!(prompt.contains("4.60971"));
        assert!(prompt.contains("-74.08175"));
        assert!(prompt.contains("hotspots"));
    }

    #[test]
    fn test_prompt_excludes_recovery_fields() {
        let record = test_record("ABC123");
        let prompt = build_prompt(&[&record]).unwrap();

        assert!(!prompt.contains("recovery"));
        assert!(!prompt.contains("status"));
    }
}
