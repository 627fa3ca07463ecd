// Copyright 2026 Rankgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for the rank gateway.
//!
//! Thin mapping from [`RankResult`] outcomes to HTTP responses. Handlers
//! never panic across the boundary: every upstream or extraction failure
//! arrives here already folded into a tagged outcome. Status mapping:
//! 400 for input and resolution failures on the rank endpoints, 404 for
//! confirmed absence on the check endpoints, 500 for transport faults
//! surfacing through the existence check and for faults in this process.

use crate::error::GatewayError;
use crate::resolver::Resolver;
use crate::types::{RankQuery, RankResult, UNRANKED_SENTINEL};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<Resolver>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(banner))
        .route("/check/:username/:platform", get(handle_check))
        .route("/check/:username/:platform/:region", get(handle_check_region))
        .route("/rank/:username", get(handle_rank_json))
        .route("/rank/:username/text", get(handle_rank_text))
        .route("/debug/:username", get(handle_debug))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given port.
pub async fn start(port: u16, state: Arc<Resolver>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("rank gateway listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

// ── Response mapping ────────────────────────────────────────────────────

/// Plain-text existence check responses (legacy literals).
fn check_response(result: &RankResult) -> (StatusCode, &'static str) {
    match result {
        RankResult::Found { .. } => (StatusCode::OK, "Información recibida"),
        RankResult::NotFound | RankResult::Unranked => {
            (StatusCode::NOT_FOUND, "Usuario no encontrado")
        }
        RankResult::UpstreamError { .. } | RankResult::Timeout => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error al obtener la información",
        ),
    }
}

/// JSON rank responses. Resolution failures answer 400; the extraction
/// miss keeps the legacy `"Unranked"` sentinel in the body so existing
/// callers can keep pattern-matching on it.
fn rank_json_response(username: &str, result: &RankResult) -> (StatusCode, Json<Value>) {
    match result {
        RankResult::Found { rank } => (
            StatusCode::OK,
            Json(json!({ "username": username, "rank": rank })),
        ),
        RankResult::Unranked => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "username": username,
                "rank": UNRANKED_SENTINEL,
                "error": "rank not found",
            })),
        ),
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "username": username,
                "error": other.failure_detail(),
            })),
        ),
    }
}

/// Plain-text rank responses.
fn rank_text_response(result: &RankResult) -> (StatusCode, String) {
    match result {
        RankResult::Found { rank } => (StatusCode::OK, rank.clone()),
        other => (
            StatusCode::BAD_REQUEST,
            format!(
                "Error: {}",
                other.failure_detail().unwrap_or_else(|| "unknown".into())
            ),
        ),
    }
}

/// Local errors: 400 for rejected input, 500 for faults in this process.
fn gateway_error_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::EmptyUsername => StatusCode::BAD_REQUEST,
        GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn gateway_error_json(username: &str, err: &GatewayError) -> (StatusCode, Json<Value>) {
    (
        gateway_error_status(err),
        Json(json!({ "username": username, "error": err.to_string() })),
    )
}

// ── Handlers ────────────────────────────────────────────────────────────

/// Service banner with the endpoint map.
async fn banner() -> Json<Value> {
    Json(json!({
        "service": "rankgate",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "online",
        "endpoints": {
            "/check/:username/:platform": "Check whether the profile exists",
            "/check/:username/:platform/:region": "Check with explicit region",
            "/rank/:username": "Ranked tier as JSON",
            "/rank/:username/text": "Ranked tier as plain text",
            "/debug/:username": "Extraction diagnostics (unstable)",
        },
    }))
}

async fn handle_check(
    Path((username, platform)): Path<(String, String)>,
    State(resolver): State<Arc<Resolver>>,
) -> impl IntoResponse {
    let query = RankQuery::new(username).with_platform(platform);
    run_check(&resolver, query).await
}

async fn handle_check_region(
    Path((username, platform, region)): Path<(String, String, String)>,
    State(resolver): State<Arc<Resolver>>,
) -> impl IntoResponse {
    let query = RankQuery::new(username)
        .with_platform(platform)
        .with_region(region);
    run_check(&resolver, query).await
}

async fn run_check(resolver: &Resolver, query: RankQuery) -> (StatusCode, &'static str) {
    match resolver.check_profile(&query).await {
        Ok(result) => check_response(&result),
        Err(GatewayError::EmptyUsername) => (StatusCode::BAD_REQUEST, "Nombre de usuario vacío"),
        Err(GatewayError::Internal(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error al obtener la información",
        ),
    }
}

async fn handle_rank_json(
    Path(username): Path<String>,
    State(resolver): State<Arc<Resolver>>,
) -> impl IntoResponse {
    match resolver.resolve_rank(&username).await {
        Ok(result) => rank_json_response(&username, &result),
        Err(e) => gateway_error_json(&username, &e),
    }
}

async fn handle_rank_text(
    Path(username): Path<String>,
    State(resolver): State<Arc<Resolver>>,
) -> impl IntoResponse {
    match resolver.resolve_rank(&username).await {
        Ok(result) => rank_text_response(&result),
        Err(e) => (gateway_error_status(&e), format!("Error: {e}")),
    }
}

async fn handle_debug(
    Path(username): Path<String>,
    State(resolver): State<Arc<Resolver>>,
) -> impl IntoResponse {
    match resolver.debug_scan(&username).await {
        Ok(report) => {
            let status = if report.error.is_some() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::OK
            };
            (status, Json(serde_json::to_value(&report).unwrap_or(Value::Null)))
        }
        Err(e) => (
            gateway_error_status(&e),
            Json(json!({ "username": username, "error": e.to_string() })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_response_literals() {
        let (status, body) = check_response(&RankResult::Found { rank: "id".into() });
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Información recibida");

        let (status, body) = check_response(&RankResult::NotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Usuario no encontrado");

        let (status, body) = check_response(&RankResult::Timeout);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error al obtener la información");
    }

    #[test]
    fn test_rank_json_found() {
        let (status, Json(body)) = rank_json_response(
            "dedreviil12",
            &RankResult::Found { rank: "Gold".into() },
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "dedreviil12");
        assert_eq!(body["rank"], "Gold");
    }

    #[test]
    fn test_rank_json_unranked_keeps_sentinel() {
        let (status, Json(body)) = rank_json_response("dedreviil12", &RankResult::Unranked);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["rank"], "Unranked");
        assert_eq!(body["error"], "rank not found");
    }

    #[test]
    fn test_local_faults_answer_500_not_400() {
        assert_eq!(
            gateway_error_status(&GatewayError::EmptyUsername),
            StatusCode::BAD_REQUEST
        );
        let fault = GatewayError::Internal("extraction task failed: panic".into());
        assert_eq!(
            gateway_error_status(&fault),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let (status, Json(body)) = gateway_error_json("dedreviil12", &fault);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("internal error"));
    }

    #[test]
    fn test_rank_text_responses() {
        let (status, body) = rank_text_response(&RankResult::Found { rank: "Gold II".into() });
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Gold II");

        let (status, body) = rank_text_response(&RankResult::Timeout);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Error: upstream timeout");
    }
}
