//! Speaker proposal endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use db::models::speaker::{CreateSpeaker, Speaker};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

async fn list_speakers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Speaker>>>, ApiError> {
    let pool = &state.db().pool;
    let speakers = Speaker::find_recent(pool, query.limit.unwrap_or(100)).await?;
    Ok(Json(ApiResponse::success(speakers)))
}

async fn create_speaker(
    State(state): State<AppState>,
    Json(data): Json<CreateSpeaker>,
) -> Result<impl IntoResponse, ApiError> {
    if data.name.trim().is_empty() || data.email.trim().is_empty() {
        return Err(ApiError::BadRequest("'name' and 'email' are required".into()));
    }

    let pool = &state.db().pool;
    let speaker = Speaker::create(pool, &data).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(speaker))))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/speakers", get(list_speakers).post(create_speaker))
}
