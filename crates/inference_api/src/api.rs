use log::debug;
use market_model::{DailyRecord, UpstreamError, UpstreamErrorBody};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inference is compute-bound; this is the longest timeout in the gateway.
const PREDICT_TIMEOUT: Duration = Duration::from_secs(15);
/// Health probes stay on a short timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Request body for the inference service's /predict endpoint.
#[derive(Debug, Serialize)]
pub struct PredictionPayload {
    pub ticker: String,
    pub days: u32,
    pub data: Vec<DailyRecord>,
}

#[derive(Debug, Deserialize)]
pub struct InferenceResponse {
    pub predictions: Vec<f64>,
    pub last_known_price: Option<f64>,
}

/// Body of the inference service's own health endpoint.
#[derive(Debug, Deserialize)]
pub struct InferenceHealth {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    pub timestamp: Option<String>,
}

pub struct InferenceAPI {
    base_url: String,
    client: reqwest::Client,
}

impl InferenceAPI {
    pub fn new(base_url: &str) -> Self {
        InferenceAPI {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Runs the model over a historical series for the requested horizon.
    pub async fn predict(
        &self,
        payload: &PredictionPayload,
    ) -> Result<InferenceResponse, UpstreamError> {
        let url = format!("{}/predict", self.base_url);
        debug!(
            "predict | url: {} | ticker: {} | days: {}",
            url, payload.ticker, payload.days
        );

        let res = self
            .client
            .post(&url)
            .timeout(PREDICT_TIMEOUT)
            .json(payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.json::<UpstreamErrorBody>().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                detail: body.into_detail(status.as_u16()),
            });
        }

        Ok(res.json::<InferenceResponse>().await?)
    }

    /// Probes the inference service's health endpoint.
    pub async fn health(&self) -> Result<InferenceHealth, UpstreamError> {
        let url = format!("{}/health", self.base_url);
        debug!("health | url: {}", url);

        let res = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.json::<UpstreamErrorBody>().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                detail: body.into_detail(status.as_u16()),
            });
        }

        Ok(res.json::<InferenceHealth>().await?)
    }
}
