//! Version-gated feature endpoint.
//!
//! The feature is available only when the deployed version is exactly "2.0",
//! which makes it easy to tell after a cutover whether the new side is live.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::Deployment;
use crate::state::AppState;

pub const FEATURE_NAME: &str = "Advanced Analytics";

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FeatureResponse {
    Available {
        feature: &'static str,
        status: &'static str,
        description: &'static str,
        environment: String,
    },
    NotAvailable {
        feature: &'static str,
        status: &'static str,
        message: &'static str,
        #[serde(rename = "currentVersion")]
        current_version: String,
    },
}

/// Decide availability for a deployment.
pub fn advanced_analytics(deployment: &Deployment) -> (StatusCode, FeatureResponse) {
    if deployment.has_new_feature() {
        (
            StatusCode::OK,
            FeatureResponse::Available {
                feature: FEATURE_NAME,
                status: "Available",
                description: "This is a new feature only available in version 2.0",
                environment: deployment.color.clone(),
            },
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            FeatureResponse::NotAvailable {
                feature: FEATURE_NAME,
                status: "Not Available",
                message: "This feature is only available in version 2.0",
                current_version: deployment.version.clone(),
            },
        )
    }
}

pub async fn new_feature(State(state): State<AppState>) -> Response {
    let (status, body) = advanced_analytics(state.deployment());
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_version(version: &str) -> Deployment {
        Deployment {
            version: version.to_string(),
            ..Deployment::default()
        }
    }

    #[test]
    fn test_available_on_2_0() {
        let (status, body) = advanced_analytics(&with_version("2.0"));
        assert_eq!(status, StatusCode::OK);
        assert!(matches!(body, FeatureResponse::Available { ref environment, .. } if environment == "blue"));
    }

    #[test]
    fn test_not_available_otherwise() {
        for version in ["1.0", "2.0.0", "V2", "", "2.0 "] {
            let (status, body) = advanced_analytics(&with_version(version));
            assert_eq!(status, StatusCode::NOT_FOUND, "{version:?}");
            assert_eq!(
                body,
                FeatureResponse::NotAvailable {
                    feature: FEATURE_NAME,
                    status: "Not Available",
                    message: "This feature is only available in version 2.0",
                    current_version: version.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_not_available_serializes_current_version() {
        let (_, body) = advanced_analytics(&with_version("1.0"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["currentVersion"], "1.0");
        assert_eq!(json["status"], "Not Available");
        assert!(json.get("environment").is_none());
    }
}
