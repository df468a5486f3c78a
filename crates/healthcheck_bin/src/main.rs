//! Container-level liveness probe: exits zero only when the gateway reports
//! an overall GOOD verdict.

use serde::Deserialize;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
enum ProbeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gateway verdict is {overall} (HTTP {status})")]
    Bad { status: u16, overall: String },
}

#[derive(Debug, Deserialize)]
struct VerdictJSON {
    overall: String,
}

fn main() -> Result<(), ProbeError> {
    let url = env::var("GATEWAY_HEALTHCHECK_URL")
        .unwrap_or_else(|_| "http://localhost:3000/health".to_string());

    // the verdict body is served on 503 too
    let res = reqwest::blocking::get(url)?;
    let status = res.status().as_u16();
    let verdict: VerdictJSON = res.json()?;

    if status != 200 || verdict.overall != "GOOD" {
        return Err(ProbeError::Bad {
            status,
            overall: verdict.overall,
        });
    }
    Ok(())
}
