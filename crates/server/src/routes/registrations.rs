//! Public registration endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use db::models::registration::{CreateRegistration, Registration};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

async fn list_registrations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Registration>>>, ApiError> {
    let pool = &state.db().pool;
    let registrations = Registration::find_recent(pool, query.limit.unwrap_or(100)).await?;
    Ok(Json(ApiResponse::success(registrations)))
}

async fn create_registration(
    State(state): State<AppState>,
    Json(data): Json<CreateRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    for (field, value) in [
        ("firstName", &data.first_name),
        ("lastName", &data.last_name),
        ("email", &data.email),
        ("phone", &data.phone),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("'{}' is required", field)));
        }
    }
    if !data.email.contains('@') {
        return Err(ApiError::BadRequest("'email' must be a valid address".into()));
    }

    let pool = &state.db().pool;
    let registration = Registration::create(pool, &data).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(registration))))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/registrations",
        get(list_registrations).post(create_registration),
    )
}
