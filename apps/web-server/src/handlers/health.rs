//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use yatube_core::domain::PostFilter;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - reports whether post storage answers.
///
/// GET /health/
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let storage_ok = match state.posts.count(PostFilter::All).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "Health check: post storage unavailable");
            false
        }
    };

    let response = HealthResponse {
        status: if storage_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if storage_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
