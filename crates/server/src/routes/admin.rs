//! Admin surface: dashboard aggregation, pending queue, activity timeline,
//! bulk actions, and one parametrized fetch/status-update pair covering
//! every entity kind.
//!
//! The whole router is mounted behind `require_admin`.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{abstract_submission::AbstractSubmission, entity::EntityKind};
use db::services::{
    bulk_actions::{self, BulkActionRequest},
    reporting::{self, ActivityItem, DashboardStats, EntityCounts, PendingItems},
    seed, workflow,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AccessContext};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: String,
    /// Abstracts only: review fields recorded alongside the transition.
    pub review_score: Option<f64>,
    pub review_comments: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkActionResult {
    pub updated_count: u64,
}

async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<DashboardStats>>, ApiError> {
    let stats = reporting::dashboard_stats(&state.db().pool).await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn get_pending(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<PendingItems>>, ApiError> {
    let pending = reporting::pending_items(&state.db().pool).await?;
    Ok(Json(ApiResponse::success(pending)))
}

async fn get_activity(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<ActivityItem>>>, ApiError> {
    let activity = reporting::recent_activity(&state.db().pool).await?;
    Ok(Json(ApiResponse::success(activity)))
}

async fn bulk_action(
    State(state): State<AppState>,
    Json(request): Json<BulkActionRequest>,
) -> Result<ResponseJson<ApiResponse<BulkActionResult>>, ApiError> {
    let updated_count = bulk_actions::bulk_apply(&state.db().pool, &request).await?;
    Ok(Json(ApiResponse::success(BulkActionResult { updated_count })))
}

fn parse_kind(entity: &str) -> Result<EntityKind, ApiError> {
    entity
        .parse::<EntityKind>()
        .map_err(ApiError::BadRequest)
}

async fn get_record(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, Uuid)>,
) -> Result<ResponseJson<ApiResponse<Value>>, ApiError> {
    let kind = parse_kind(&entity)?;
    let record = workflow::fetch(&state.db().pool, kind, id).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn update_record_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AccessContext>,
    Path((entity, id)): Path<(String, Uuid)>,
    Json(update): Json<StatusUpdate>,
) -> Result<ResponseJson<ApiResponse<Value>>, ApiError> {
    let kind = parse_kind(&entity)?;
    let pool = &state.db().pool;

    if kind == EntityKind::Abstracts
        && (update.review_score.is_some() || update.review_comments.is_some())
    {
        AbstractSubmission::record_review(
            pool,
            id,
            update.review_score,
            update.review_comments.as_deref(),
        )
        .await?;
    }

    let record =
        workflow::update_status(pool, kind, id, &update.status, Some(&ctx.username)).await?;
    Ok(Json(ApiResponse::success(record)))
}

fn seed_enabled() -> bool {
    cfg!(debug_assertions)
        || std::env::var("SEED_ENABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
}

async fn get_seed_counts(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<EntityCounts>>, ApiError> {
    if !seed_enabled() {
        return Err(ApiError::Forbidden("Seeding is disabled".to_string()));
    }
    let counts = seed::seed_counts(&state.db().pool).await?;
    Ok(Json(ApiResponse::success(counts)))
}

async fn post_seed(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<EntityCounts>>, ApiError> {
    if !seed_enabled() {
        return Err(ApiError::Forbidden("Seeding is disabled".to_string()));
    }
    let counts = seed::seed_demo_data(&state.db().pool).await?;
    Ok(Json(ApiResponse::success_with_message(
        counts,
        "Demo data inserted",
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/pending", get(get_pending))
        .route("/activity", get(get_activity))
        .route("/bulk-action", post(bulk_action))
        .route("/seed", get(get_seed_counts).post(post_seed))
        .route("/{entity}/{id}", get(get_record).patch(update_record_status))
}
