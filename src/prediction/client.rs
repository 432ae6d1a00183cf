use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::window::SequenceRequest;
use crate::config::PredictionConfig;
use crate::error::PredictionError;

/// Verdict returned by the remote `/predict/sequence` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub anomaly: bool,
    pub failure_probability: f64,
    #[serde(default)]
    pub prediction: Option<u8>,
}

/// HTTP client for the external prediction service.
#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PredictionClient {
    pub fn new(config: &PredictionConfig) -> Result<Self, PredictionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub async fn predict_sequence(
        &self,
        request: &SequenceRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        let url = format!("{}/predict/sequence", self.base_url);
        debug!(%url, samples = request.sequence.len(), "requesting prediction");

        let mut builder = self.http.post(&url).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let verdict: PredictionResponse = response.json().await?;
        if !(0.0..=1.0).contains(&verdict.failure_probability) {
            return Err(PredictionError::InvalidProbability(verdict.failure_probability));
        }
        Ok(verdict)
    }
}
