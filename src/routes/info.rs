//! Service introspection endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub service: String,
    pub version: String,
    pub color: String,
    pub hostname: String,
    /// Seconds since startup
    pub uptime: f64,
    pub platform: &'static str,
    /// Runtime identifier; the field name is kept for existing dashboards
    #[serde(rename = "nodeVersion")]
    pub runtime_version: &'static str,
}

pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let deployment = state.deployment();
    Json(InfoResponse {
        service: deployment.name.clone(),
        version: deployment.version.clone(),
        color: deployment.color.clone(),
        hostname: state.host.hostname.clone(),
        uptime: state.host.uptime_seconds(),
        platform: state.host.platform,
        runtime_version: state.host.runtime,
    })
}
