use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{info, warn};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::config::Profile;
use crate::error::{ValidatorError, ValidatorResult};
use crate::report::ValidationReport;
use crate::validate_text;

/// Body of a validation request: the two files' contents inline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    #[serde(default)]
    pub profile: Profile,
    pub instance: String,
    pub solution: String,
}

async fn validate_handler(
    Json(request): Json<ValidationRequest>,
) -> Result<Json<ValidationReport>, (StatusCode, String)> {
    match validate_text(&request.instance, &request.solution, request.profile) {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            warn!("Rejected validation request: {e}");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

pub fn router() -> Router {
    Router::new().route("/v1/timetable/validate", post(validate_handler))
}

pub async fn run_server(addr: SocketAddr) -> ValidatorResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ValidatorError::Io {
            context: format!("binding {addr}"),
            source,
        })?;

    let local = listener.local_addr().map_err(|source| ValidatorError::Io {
        context: "reading listener address".to_string(),
        source,
    })?;
    info!("Server running at http://{local}");

    axum::serve(listener, router())
        .await
        .map_err(|source| ValidatorError::Io {
            context: "serving requests".to_string(),
            source,
        })
}
