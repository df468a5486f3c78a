use crate::errors::GatewayError;
use crate::utils;
use log::{debug, error};
use market_model::{DailyRecord, UpstreamError};
use serde::Serialize;
use stockdata_api::api::StockDataAPI;

/// Response body for GET /api/stock/{ticker}.
#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub ticker: String,
    pub data_points: usize,
    pub data: Vec<DailyRecord>,
}

/// Proxies the history provider. Failure statuses from the provider are
/// echoed to the client with their original code and detail.
pub async fn fetch_stock(api: &StockDataAPI, raw_ticker: &str) -> Result<StockResponse, GatewayError> {
    let ticker = utils::normalize_ticker(raw_ticker);
    if !ticker.chars().any(char::is_alphanumeric) {
        return Err(GatewayError::Validation(
            "Ticker must contain at least one alphanumeric character.".to_string(),
        ));
    }

    debug!("fetch_stock | ticker: {}", ticker);

    let data = api.get_history(&ticker).await.map_err(|e| match e {
        UpstreamError::Unreachable(reason) => {
            error!("stock data service unreachable: {}", reason);
            GatewayError::Unavailable("Could not reach the stock data service.".to_string())
        }
        UpstreamError::Status { status, detail } => GatewayError::UpstreamStatus { status, detail },
        UpstreamError::Empty => GatewayError::NoData(ticker.clone()),
        UpstreamError::Malformed(reason) => {
            error!("stock data service returned malformed body: {}", reason);
            GatewayError::Malformed(
                "The stock data service returned an unexpected response shape.".to_string(),
            )
        }
    })?;

    Ok(StockResponse {
        ticker,
        data_points: data.len(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, HttpServer, test, web};
    use std::net::TcpListener;

    fn record(close: f64) -> DailyRecord {
        DailyRecord {
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    async fn mock_two_records(_ticker: web::Path<String>) -> HttpResponse {
        HttpResponse::Ok().json(vec![record(1.0), record(2.0)])
    }

    async fn mock_empty(_ticker: web::Path<String>) -> HttpResponse {
        HttpResponse::Ok().json(Vec::<DailyRecord>::new())
    }

    async fn mock_teapot(_ticker: web::Path<String>) -> HttpResponse {
        HttpResponse::ImATeapot().json(serde_json::json!({"detail": "short and stout"}))
    }

    fn spawn_provider<F, Fut>(handler: F) -> String
    where
        F: Fn(web::Path<String>) -> Fut + Clone + Send + 'static,
        Fut: std::future::Future<Output = HttpResponse> + 'static,
    {
        let srv = HttpServer::new(move || {
            App::new().route("/stock/{ticker}", web::get().to(handler.clone()))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = srv.addrs()[0];
        actix_web::rt::spawn(srv.run());
        format!("http://{}", addr)
    }

    fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[actix_web::test]
    async fn fetch_stock_pass_counts_and_normalizes() {
        let api = StockDataAPI::new(&spawn_provider(mock_two_records));
        let response = fetch_stock(&api, "goog").await.unwrap();
        assert_eq!(response.ticker, "GOOG");
        assert_eq!(response.data_points, 2);
        assert_eq!(response.data.len(), 2);
    }

    #[actix_web::test]
    async fn fetch_stock_fail_empty_is_not_found() {
        let api = StockDataAPI::new(&spawn_provider(mock_empty));
        let err = fetch_stock(&api, "GOOG").await.unwrap_err();
        assert!(matches!(err, GatewayError::NoData(t) if t == "GOOG"));
    }

    #[actix_web::test]
    async fn fetch_stock_fail_status_passthrough() {
        let api = StockDataAPI::new(&spawn_provider(mock_teapot));
        let err = fetch_stock(&api, "GOOG").await.unwrap_err();
        match err {
            GatewayError::UpstreamStatus { status, detail } => {
                assert_eq!(status, 418);
                assert_eq!(detail, "short and stout");
            }
            other => panic!("expected UpstreamStatus, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn fetch_stock_fail_unreachable() {
        let api = StockDataAPI::new(&refused_url());
        let err = fetch_stock(&api, "GOOG").await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
    }

    #[actix_web::test]
    async fn fetch_stock_fail_blank_ticker() {
        let api = StockDataAPI::new("http://localhost:1");
        let err = fetch_stock(&api, "***").await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[actix_web::test]
    async fn endpoint_fail_empty_series_is_404() {
        let base = spawn_provider(mock_empty);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(StockDataAPI::new(&base)))
                .configure(crate::routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/stock/GOOG").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 404);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Data Not Found");
    }

    #[actix_web::test]
    async fn endpoint_fail_upstream_status_passthrough() {
        let base = spawn_provider(mock_teapot);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(StockDataAPI::new(&base)))
                .configure(crate::routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/stock/GOOG").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 418);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Upstream Error");
        assert_eq!(body["message"], "short and stout");
    }
}
