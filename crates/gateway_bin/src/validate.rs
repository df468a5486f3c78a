use crate::errors::GatewayError;
use crate::utils;
use serde_json::Value;

pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 30;

/// A validated, normalized prediction request.
#[derive(Debug, PartialEq)]
pub struct PredictionRequest {
    pub ticker: String,
    pub days: u32,
}

/// Pure request validation; performs no I/O.
pub fn validate(body: &Value) -> Result<PredictionRequest, GatewayError> {
    let ticker = body
        .get("ticker")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let days = body.get("days");

    let (Some(ticker), Some(days)) = (ticker, days) else {
        return Err(GatewayError::Validation(
            "The request body must contain \"ticker\" and \"days\".".to_string(),
        ));
    };

    // whole trading days only
    let days = days
        .as_i64()
        .filter(|d| (MIN_DAYS..=MAX_DAYS).contains(d))
        .ok_or_else(|| {
            GatewayError::Validation("Days must be a whole number between 1 and 30.".to_string())
        })?;

    let ticker = utils::normalize_ticker(ticker);
    if !ticker.chars().any(char::is_alphanumeric) {
        return Err(GatewayError::Validation(
            "Ticker must contain at least one alphanumeric character.".to_string(),
        ));
    }

    Ok(PredictionRequest {
        ticker,
        days: days as u32,
    })
}
