//! HTML status page showing which deployment is serving traffic.

use axum::{extract::State, response::Html};
use chrono::Local;
use tracing::instrument;

use crate::error::{AppErrorResponse, ResultExt};
use crate::state::AppState;
use crate::templates::{local_timestamp, render_status_page};

#[instrument(name = "status::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppErrorResponse> {
    let timestamp = local_timestamp(&Local::now());
    let html = render_status_page(
        &state.tera,
        state.deployment(),
        &state.host.hostname,
        &timestamp,
    )
    .with_deployment(state.deployment())?;
    Ok(Html(html))
}
