//! HTTP route handlers.
//!
//! Every response is marked uncacheable and tagged with the deployment color,
//! so a client behind the load balancer can always tell which side answered.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod db_test;
pub mod feature;
pub mod health;
pub mod info;
pub mod status;

use std::any::Any;

use axum::{
    http::{StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use http::header::{HeaderName, HeaderValue, CACHE_CONTROL, SERVER};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_NO_STORE, RUNTIME_IDENT};
use crate::error::panic_response;
use crate::middleware::request_id_layer;
use crate::state::AppState;

pub const DEPLOYMENT_COLOR_HEADER: &str = "x-deployment-color";

#[derive(Debug, Serialize)]
struct NotFoundBody {
    error: &'static str,
    path: String,
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            error: "Not Found",
            path: uri.path().to_string(),
        }),
    )
}

/// Creates the Axum router with all routes and response headers.
pub fn create_router(state: AppState) -> Router {
    let deployment = state.deployment().clone();
    let panic_deployment = deployment.clone();

    let api_routes = Router::new()
        .route("/api/info", get(info::info))
        .route("/api/db-test", get(db_test::db_test))
        .route("/api/new-feature", get(feature::new_feature));

    let mut router = Router::new()
        .route("/", get(status::index))
        .route("/health", get(health::health))
        .merge(api_routes)
        .fallback(not_found)
        .with_state(state)
        // Panics become the same generic 500 as handler errors; applied first so
        // the header layers below also wrap the panic response
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(&panic_deployment, panic),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            SERVER,
            HeaderValue::from_static(RUNTIME_IDENT),
        ));

    // Operator-supplied colors are not guaranteed to be header-safe
    match HeaderValue::from_str(&deployment.color) {
        Ok(value) => {
            router = router.layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static(DEPLOYMENT_COLOR_HEADER),
                value,
            ));
        }
        Err(_) => {
            tracing::warn!(
                color = %deployment.color,
                "Color is not a valid header value, omitting {}",
                DEPLOYMENT_COLOR_HEADER
            );
        }
    }

    router
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
