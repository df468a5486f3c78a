use serde::Deserialize;
use thiserror::Error;

/// Closed classification of upstream-call failures.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused or request timed out.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    /// Upstream was reachable but answered with a non-2xx status.
    #[error("upstream returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    /// Upstream answered 2xx with an empty dataset.
    #[error("upstream returned no data")]
    Empty,
    /// Upstream answered 2xx with a body that violates its contract.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> UpstreamError {
        if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            // connect, timeout and any other transport-level failure
            UpstreamError::Unreachable(err.to_string())
        }
    }
}

/// Error body shape used by the upstream services: FastAPI puts the reason in
/// `detail`, others in `message`. Either is forwarded verbatim.
#[derive(Debug, Default, Deserialize)]
pub struct UpstreamErrorBody {
    pub detail: Option<String>,
    pub message: Option<String>,
}

impl UpstreamErrorBody {
    pub fn into_detail(self, status: u16) -> String {
        self.detail
            .or(self.message)
            .unwrap_or_else(|| format!("upstream returned status {status}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_pass_detail_preferred() {
        let body: UpstreamErrorBody =
            serde_json::from_str(r#"{"detail":"no data","message":"ignored"}"#).unwrap();
        assert_eq!(body.into_detail(404), "no data");
    }

    #[test]
    fn error_body_pass_message_fallback() {
        let body: UpstreamErrorBody = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(body.into_detail(500), "boom");
    }

    #[test]
    fn error_body_pass_status_fallback() {
        let body: UpstreamErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_detail(502), "upstream returned status 502");
    }
}
