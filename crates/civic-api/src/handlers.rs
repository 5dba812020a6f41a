//! Request handlers for the triage API.
//!
//! Every handler returns `(StatusCode, Json<Value>)` so error payloads
//! and success payloads share one shape. Bad enum values in a request
//! body are rejected by the JSON extractor with a 422 before any
//! handler runs; only location bounds need an explicit check here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use civic_core::{
    Decision, GeoPoint, IssueMetrics, IssueType, PerceptualHash, Report, RoadContext,
    CIVIC_VERSION,
};
use civic_orders::SiteLocation;
use civic_rewards::RewardContext;

use crate::state::AppState;

/// Body for `POST /v1/assess`.
///
/// The issue type is a free-form intake label; road context and
/// metrics default to a quiet residential site when omitted.
#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub issue_type: String,
    #[serde(default)]
    pub metrics: IssueMetrics,
    #[serde(default)]
    pub context: RoadContext,
}

/// Body for `POST /v1/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub vision_confidence: f64,
    pub agent_result: Decision,
    pub location: GeoPoint,
    pub issue_type: String,
    #[serde(default)]
    pub image_fingerprint: Option<PerceptualHash>,
}

/// Body for `POST /v1/reward`.
#[derive(Debug, Deserialize)]
pub struct RewardRequest {
    pub user_id: String,
    pub report_id: String,
    pub report_data: RewardContext,
}

/// Body for `POST /v1/work-order`.
#[derive(Debug, Deserialize)]
pub struct WorkOrderRequest {
    pub report_id: String,
    pub location: SiteLocation,
    pub decision: Decision,
}

fn ok_json<T: Serialize>(value: &T) -> (StatusCode, Json<Value>) {
    match serde_json::to_value(value) {
        Ok(v) => (StatusCode::OK, Json(v)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("response serialization failed: {e}") })),
        ),
    }
}

fn rejected(error: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": error.to_string() })),
    )
}

/// GET /v1/health
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "civic-api",
            "version": CIVIC_VERSION,
        })),
    )
}

/// POST /v1/assess - score one report and return the full decision
pub async fn assess(
    State(state): State<AppState>,
    Json(payload): Json<AssessRequest>,
) -> (StatusCode, Json<Value>) {
    let issue_type = IssueType::parse_lenient(&payload.issue_type);
    let decision = state
        .agent
        .decide(issue_type, &payload.metrics, &payload.context);
    state.metrics.assessed.inc();
    ok_json(&decision)
}

/// POST /v1/verify - run the verification gates over a scored report
pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> (StatusCode, Json<Value>) {
    if let Err(e) = payload.location.validate() {
        return rejected(e);
    }

    let issue_type = IssueType::parse_lenient(&payload.issue_type);
    let mut report = Report::new(payload.location, issue_type, payload.vision_confidence);
    if let Some(fingerprint) = payload.image_fingerprint {
        report = report.with_fingerprint(fingerprint);
    }

    let result = state.engine.verify(&report, &payload.agent_result);
    state.metrics.record_verification(result.status);
    ok_json(&result)
}

/// POST /v1/reward - settle points and trust for a dispositioned report
pub async fn reward(
    State(state): State<AppState>,
    Json(payload): Json<RewardRequest>,
) -> (StatusCode, Json<Value>) {
    let receipt = state
        .ledger
        .process(&payload.user_id, &payload.report_id, &payload.report_data);
    state.metrics.rewards.inc();
    ok_json(&receipt)
}

/// POST /v1/work-order - draft a repair order for a High or Critical decision
pub async fn work_order(
    State(state): State<AppState>,
    Json(payload): Json<WorkOrderRequest>,
) -> (StatusCode, Json<Value>) {
    let point = GeoPoint::new(payload.location.lat, payload.location.lon);
    if let Err(e) = point.validate() {
        return rejected(e);
    }

    match state
        .drafter
        .draft(&payload.report_id, &payload.location, &payload.decision)
    {
        Ok(Some(draft)) => ok_json(&draft),
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "eligible": false,
                "reason": format!(
                    "priority {} is below the work-order threshold",
                    payload.decision.priority
                ),
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

/// GET /v1/users/{id} - current trust score and point balance
pub async fn user_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.ledger.balance(&user_id) {
        Some(balance) => ok_json(&balance),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no ledger activity for user {user_id}") })),
        ),
    }
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics.encode() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
