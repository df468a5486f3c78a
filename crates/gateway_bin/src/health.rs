use chrono::{DateTime, Utc};
use inference_api::api::InferenceAPI;
use log::warn;
use market_model::UpstreamError;
use serde::Serialize;

/// Where the inference service stands, one value per distinguishable outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamStatus {
    Healthy,
    Degraded,
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Overall {
    Good,
    Bad,
}

/// Aggregated two-hop health: this process, the inference service, and the
/// model it hosts. Recomputed on every check.
#[derive(Debug, Serialize)]
pub struct HealthVerdict {
    pub gateway_status: &'static str,
    pub upstream_status: UpstreamStatus,
    pub model_loaded: bool,
    pub overall: Overall,
    pub timestamp: DateTime<Utc>,
}

impl HealthVerdict {
    pub fn is_good(&self) -> bool {
        self.overall == Overall::Good
    }
}

/// All-or-nothing fold over the three sub-checks.
fn combine(local_running: bool, upstream: UpstreamStatus, model_loaded: bool) -> Overall {
    if local_running && upstream == UpstreamStatus::Healthy && model_loaded {
        Overall::Good
    } else {
        Overall::Bad
    }
}

pub async fn check_health(inference: &InferenceAPI) -> HealthVerdict {
    // the process is up if this runs at all
    let local_running = true;

    let (upstream_status, model_loaded) = match inference.health().await {
        Ok(health) if health.status == "healthy" => (UpstreamStatus::Healthy, health.model_loaded),
        Ok(health) => {
            warn!("inference service reports status \"{}\"", health.status);
            (UpstreamStatus::Degraded, health.model_loaded)
        }
        Err(UpstreamError::Unreachable(reason)) => {
            warn!("inference health probe unreachable: {}", reason);
            (UpstreamStatus::Unreachable, false)
        }
        Err(err) => {
            warn!("inference health probe degraded: {}", err);
            (UpstreamStatus::Degraded, false)
        }
    };

    HealthVerdict {
        gateway_status: "running",
        upstream_status,
        model_loaded,
        overall: combine(local_running, upstream_status, model_loaded),
        timestamp: Utc::now(),
    }
}
