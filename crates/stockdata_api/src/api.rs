use log::debug;
use market_model::{DailyRecord, UpstreamError, UpstreamErrorBody};
use std::time::Duration;

const HISTORY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct StockDataAPI {
    base_url: String,
    client: reqwest::Client,
}

impl StockDataAPI {
    pub fn new(base_url: &str) -> Self {
        StockDataAPI {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetches the full daily history for a ticker. Non-2xx answers keep the
    /// provider's status code and its `detail`/`message` field verbatim.
    pub async fn get_history(&self, ticker: &str) -> Result<Vec<DailyRecord>, UpstreamError> {
        let url = format!("{}/stock/{}", self.base_url, ticker);
        debug!("get_history | url: {}", url);

        let res = self
            .client
            .get(&url)
            .timeout(HISTORY_TIMEOUT)
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

        let history = res.json::<Vec<DailyRecord>>().await?;
        if history.is_empty() {
            return Err(UpstreamError::Empty);
        }
        Ok(history)
    }
}
