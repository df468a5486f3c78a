use crate::errors::GatewayError;
use crate::validate::{self, PredictionRequest};
use inference_api::api::{InferenceAPI, PredictionPayload};
use log::{debug, error};
use market_model::UpstreamError;
use serde::Serialize;
use stockdata_api::api::StockDataAPI;

/// The model consumes a 60-record input window.
pub const MIN_HISTORY_RECORDS: usize = 60;

/// Final response body for POST /api/predict. Field names are the public
/// contract consumed by the frontend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub ticker: String,
    pub prediction_days: u32,
    pub predictions: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_known_price: Option<f64>,
}

/// The prediction pipeline: validate, fetch history, run inference, reshape.
/// The first failure aborts the request; nothing is retried.
pub async fn run(
    history: &StockDataAPI,
    inference: &InferenceAPI,
    body: &serde_json::Value,
) -> Result<PredictionResult, GatewayError> {
    let PredictionRequest { ticker, days } = validate::validate(body)?;

    debug!("predict | ticker: {} | days: {}", ticker, days);

    let records = history.get_history(&ticker).await.map_err(|e| match e {
        UpstreamError::Unreachable(reason) => {
            error!("stock data service unreachable: {}", reason);
            GatewayError::Unavailable("The stock data service is currently unreachable.".to_string())
        }
        UpstreamError::Status { status, detail } => GatewayError::UpstreamStatus { status, detail },
        UpstreamError::Empty => GatewayError::InsufficientHistory {
            ticker: ticker.clone(),
            got: 0,
            min: MIN_HISTORY_RECORDS,
        },
        UpstreamError::Malformed(reason) => {
            error!("stock data service returned malformed body: {}", reason);
            GatewayError::Malformed(
                "The stock data service returned an unexpected response shape.".to_string(),
            )
        }
    })?;

    if records.len() < MIN_HISTORY_RECORDS {
        return Err(GatewayError::InsufficientHistory {
            ticker,
            got: records.len(),
            min: MIN_HISTORY_RECORDS,
        });
    }

    let payload = PredictionPayload {
        ticker: ticker.clone(),
        days,
        data: records,
    };

    let response = inference.predict(&payload).await.map_err(|e| match e {
        UpstreamError::Unreachable(reason) => {
            error!("prediction service unreachable: {}", reason);
            GatewayError::Unavailable("The ML prediction service is currently unreachable.".to_string())
        }
        UpstreamError::Status { status, detail } => {
            error!("prediction service returned status {}: {}", status, detail);
            GatewayError::Inference(detail)
        }
        UpstreamError::Empty | UpstreamError::Malformed(_) => {
            error!("prediction service returned malformed body: {}", e);
            GatewayError::Malformed(
                "The prediction service returned an unexpected response shape.".to_string(),
            )
        }
    })?;

    if response.predictions.len() != days as usize {
        error!(
            "prediction service returned {} predictions for a {}-day horizon",
            response.predictions.len(),
            days
        );
        return Err(GatewayError::Malformed(
            "The prediction service returned the wrong number of predictions.".to_string(),
        ));
    }

    Ok(PredictionResult {
        ticker,
        prediction_days: days,
        predictions: response.predictions,
        last_known_price: response.last_known_price,
    })
}
