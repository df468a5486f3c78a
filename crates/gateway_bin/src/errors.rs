use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong between request entry and response emission.
/// Each variant maps to one HTTP status and renders as `{error, message}`.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed client input. Never reaches an upstream.
    #[error("{0}")]
    Validation(String),

    #[error("A valid X-API-KEY is required to access this endpoint.")]
    Unauthorized,

    /// Upstream was reachable but had nothing for this ticker.
    #[error("No historical data retrieved for ticker: {0}")]
    NoData(String),

    /// The series is too short to feed the model.
    #[error("Historical data for {ticker} has {got} records, at least {min} are required.")]
    InsufficientHistory {
        ticker: String,
        got: usize,
        min: usize,
    },

    /// Network-level upstream failure.
    #[error("{0}")]
    Unavailable(String),

    /// Failure status from the history provider, passed through untouched.
    #[error("{detail}")]
    UpstreamStatus { status: u16, detail: String },

    /// The inference service was reachable but failed. Always 500.
    #[error("Prediction failed upstream: {0}")]
    Inference(String),

    /// An upstream violated its response contract.
    #[error("{0}")]
    Malformed(String),
}

impl GatewayError {
    fn label(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "Validation Error",
            GatewayError::Unauthorized => "Unauthorized",
            GatewayError::NoData(_) => "Data Not Found",
            GatewayError::InsufficientHistory { .. } => "Insufficient History",
            GatewayError::Unavailable(_) => "Service Unavailable",
            GatewayError::UpstreamStatus { .. } => "Upstream Error",
            GatewayError::Inference(_) | GatewayError::Malformed(_) => "Internal Server Error",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::NoData(_) => StatusCode::NOT_FOUND,
            GatewayError::InsufficientHistory { .. } | GatewayError::Unavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GatewayError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            GatewayError::Inference(_) | GatewayError::Malformed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // logged before the response leaves the gateway
        if status.is_server_error() {
            error!("{} ({}): {}", self.label(), status.as_u16(), self);
        } else {
            warn!("{} ({}): {}", self.label(), status.as_u16(), self);
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.label().to_string(),
            message: self.to_string(),
        })
    }
}
