//! Database connectivity probe.
//!
//! Failures are reported to the caller with the driver's message and a 500;
//! they are not retried and never reach the catch-all error handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::instrument;

use crate::db::DbInfo;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DbTestResponse {
    pub success: bool,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DbInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[instrument(name = "db_test::db_test", skip(state))]
pub async fn db_test(State(state): State<AppState>) -> Response {
    let environment = state.deployment().color.clone();

    match state.db.server_info().await {
        Ok(info) => {
            tracing::debug!(db_version = %info.db_version, "Database probe succeeded");
            Json(DbTestResponse {
                success: true,
                environment,
                database: Some(info),
                error: None,
            })
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Database probe failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbTestResponse {
                    success: false,
                    environment,
                    database: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
