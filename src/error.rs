//! Request-level error handling.
//!
//! Handlers return [`AppErrorResponse`], which carries the deployment identity
//! so the catch-all 500 body can report which side of the deployment failed.
//! The database probe is the exception: it reports its own failures.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::Deployment;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),
}

/// Body of every catch-all 500 response. Never includes error detail.
#[derive(Debug, Serialize)]
pub struct InternalErrorBody<'a> {
    pub error: &'static str,
    pub environment: &'a str,
    pub version: &'a str,
}

impl<'a> InternalErrorBody<'a> {
    pub fn new(deployment: &'a Deployment) -> Self {
        Self {
            error: "Internal Server Error",
            environment: &deployment.color,
            version: &deployment.version,
        }
    }
}

/// An [`AppError`] paired with the deployment it occurred in.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub deployment: Deployment,
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.error, "Unhandled request error");
        internal_error_response(&self.deployment)
    }
}

/// Attach the deployment identity to an error result.
pub trait ResultExt<T> {
    fn with_deployment(self, deployment: &Deployment) -> Result<T, AppErrorResponse>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_deployment(self, deployment: &Deployment) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            deployment: deployment.clone(),
        })
    }
}

pub fn internal_error_response(deployment: &Deployment) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(InternalErrorBody::new(deployment)),
    )
        .into_response()
}

/// Build the response for a handler that panicked.
pub fn panic_response(deployment: &Deployment, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");
    internal_error_response(deployment)
}
