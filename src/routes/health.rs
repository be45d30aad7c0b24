//! Health check endpoint for container orchestration.
//!
//! A liveness probe: it answers as long as the process accepts connections and
//! never touches the database. The body identifies which side of the
//! deployment answered.

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub version: String,
    /// ISO-8601 UTC with millisecond precision
    pub timestamp: String,
    pub hostname: String,
}

/// Health check handler.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let deployment = state.deployment();
    Json(HealthResponse {
        status: "healthy",
        environment: deployment.color.clone(),
        version: deployment.version.clone(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        hostname: state.host.hostname.clone(),
    })
}
