//! Predictor backed by the model service's HTTP API.
//!
//! Sends `POST {base_url}/predict/{variant}` with the encoded feature
//! object and reads back `{"prediction": 0|1, "proba": <p>}`, where
//! `proba` is the model's confidence in the predicted class.

use std::time::Duration;

use async_trait::async_trait;
use obrisk_core::intake::{IntakeRecord, Variant};
use obrisk_core::risk::RiskAssessment;
use serde::Deserialize;

use crate::{features, Predictor, PredictorError};

/// HTTP client for a single model service.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    base_url: String,
}

/// Body returned by the `/predict/{variant}` endpoints.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub prediction: i64,
    #[serde(default)]
    pub proba: Option<f64>,
}

impl PredictResponse {
    /// Probability of the positive class.
    ///
    /// `proba` belongs to the predicted class, so a negative prediction
    /// is flipped. A missing `proba` is read as full confidence.
    pub fn positive_probability(&self) -> f64 {
        match (self.prediction, self.proba) {
            (p, Some(proba)) if p > 0 => proba,
            (p, None) if p > 0 => 1.0,
            (_, Some(proba)) => 1.0 - proba,
            (_, None) => 0.0,
        }
    }
}

impl HttpPredictor {
    /// Create a client for the service at `base_url`, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PredictorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, PredictorError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PredictorError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(
        &self,
        variant: Variant,
        record: &IntakeRecord,
    ) -> Result<RiskAssessment, PredictorError> {
        let body = features::encode(variant, record);

        let response = self
            .client
            .post(format!("{}/predict/{}", self.base_url, variant))
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: PredictResponse = response.json().await?;

        tracing::debug!(
            variant = %variant,
            prediction = parsed.prediction,
            proba = parsed.proba,
            "Model service answered"
        );

        Ok(RiskAssessment::from_probability(
            variant,
            parsed.positive_probability(),
        ))
    }

    /// Reachable means the service answered at all; the status is ignored
    /// since the model service has no dedicated health route.
    async fn ready(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(base_url = %self.base_url, error = %e, "Model service unreachable");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(prediction: i64, proba: Option<f64>) -> PredictResponse {
        PredictResponse { prediction, proba }
    }

    #[test]
    fn positive_prediction_uses_proba_directly() {
        assert_eq!(response(1, Some(0.82)).positive_probability(), 0.82);
    }

    #[test]
    fn negative_prediction_is_flipped() {
        let p = response(0, Some(0.9)).positive_probability();
        assert!((p - 0.1).abs() < 1e-9);
    }

    #[test]
    fn missing_proba_follows_the_prediction() {
        assert_eq!(response(1, None).positive_probability(), 1.0);
        assert_eq!(response(0, None).positive_probability(), 0.0);
    }

    #[test]
    fn response_body_without_proba_parses() {
        let parsed: PredictResponse = serde_json::from_str(r#"{"prediction": 1}"#).unwrap();
        assert_eq!(parsed.prediction, 1);
        assert_eq!(parsed.proba, None);
    }

    #[tokio::test]
    async fn unreachable_service_is_not_ready() {
        let predictor = HttpPredictor::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        assert!(!predictor.ready().await);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let predictor = HttpPredictor::with_client(reqwest::Client::new(), "http://model:8000/");
        assert_eq!(predictor.base_url(), "http://model:8000");
    }
}
