use dotenvy::dotenv;
use inference_api::api::InferenceAPI;
use log::{error, info};
use stockdata_api::api::StockDataAPI;
use std::{env, process::exit};

use actix_web::{
    App, HttpResponse, HttpServer, Responder, ResponseError,
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    get,
    http::StatusCode,
    middleware::{self, Logger, Next},
    web,
};

use errors::GatewayError;

mod errors;
mod health;
mod predict;
mod stock;
mod utils;
mod validate;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .body("Gateway is running. Access the main endpoint at /api/predict (requires X-API-KEY).")
}

#[get("/health")]
async fn get_health(inference: web::Data<InferenceAPI>) -> impl Responder {
    let verdict = health::check_health(inference.get_ref()).await;
    let status = if verdict.is_good() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    HttpResponse::build(status).json(verdict)
}

#[get("/api/stock/{ticker}")]
async fn get_stock(
    ticker: web::Path<String>,
    api: web::Data<StockDataAPI>,
) -> Result<impl Responder, GatewayError> {
    let response = stock::fetch_stock(api.get_ref(), &ticker).await?;
    Ok(web::Json(response))
}

async fn post_predict(
    body: web::Json<serde_json::Value>,
    history: web::Data<StockDataAPI>,
    inference: web::Data<InferenceAPI>,
) -> Result<impl Responder, GatewayError> {
    let result = predict::run(history.get_ref(), inference.get_ref(), &body).await?;
    Ok(web::Json(result))
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(errors::ErrorBody {
        error: "Not Found".to_string(),
        message: "No such route.".to_string(),
    })
}

/// Protected routes require the shared key in the X-API-KEY header.
async fn require_api_key(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    let authorized = {
        let expected = req
            .app_data::<web::Data<Config>>()
            .map(|config| config.api_key.as_str());
        let received = req
            .headers()
            .get("X-API-KEY")
            .and_then(|value| value.to_str().ok());
        matches!((expected, received), (Some(e), Some(r)) if e == r)
    };

    if authorized {
        Ok(next.call(req).await?.map_into_boxed_body())
    } else {
        let response = GatewayError::Unauthorized.error_response();
        Ok(req.into_response(response))
    }
}

pub(crate) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(get_health)
        .service(get_stock)
        .service(
            web::resource("/api/predict")
                .wrap(middleware::from_fn(require_api_key))
                .route(web::post().to(post_predict)),
        )
        .default_service(web::to(not_found));
}

pub(crate) struct Config {
    history_url: String,
    inference_url: String,
    api_key: String,
    port: u16,
    workers: usize,
}

impl Config {
    fn new() -> Result<Config, Box<dyn std::error::Error>> {
        dotenv().ok();

        let history_url = env::var("GATEWAY_HISTORY_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let inference_url = env::var("GATEWAY_INFERENCE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let api_key = env::var("GATEWAY_API_KEY")?;
        if api_key.trim().is_empty() {
            return Err("GATEWAY_API_KEY must not be empty".into());
        }

        let port: u16 = match env::var("GATEWAY_PORT") {
            Ok(value) => value.parse()?,
            Err(_) => 3000,
        };

        let mut workers: usize = match env::var("GATEWAY_WORKERS") {
            Ok(value) => value.parse()?,
            Err(_) => 1,
        };
        if workers == 0 {
            workers = 1;
        }

        Ok(Config {
            history_url,
            inference_url,
            api_key,
            port,
            workers,
        })
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not create config: {}", e);
            exit(1);
        }
    };

    let stockdata_api = web::Data::new(StockDataAPI::new(&config.history_url));
    let inference_api = web::Data::new(InferenceAPI::new(&config.inference_url));
    let port = config.port;
    let workers = config.workers;
    let config = web::Data::new(config);

    info!("Gateway listening on port {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(stockdata_api.clone())
            .app_data(inference_api.clone())
            .configure(routes)
            .wrap(Logger::default())
    })
    .bind(("0.0.0.0", port))?
    .workers(workers)
    .run()
    .await
}
