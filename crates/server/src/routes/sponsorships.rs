//! Sponsorship enquiry endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use db::models::sponsorship::{CreateSponsorship, Sponsorship};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

async fn list_sponsorships(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Sponsorship>>>, ApiError> {
    let pool = &state.db().pool;
    let sponsorships = Sponsorship::find_recent(pool, query.limit.unwrap_or(100)).await?;
    Ok(Json(ApiResponse::success(sponsorships)))
}

async fn create_sponsorship(
    State(state): State<AppState>,
    Json(data): Json<CreateSponsorship>,
) -> Result<impl IntoResponse, ApiError> {
    for (field, value) in [
        ("companyName", &data.company_name),
        ("email", &data.email),
        ("package", &data.package),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("'{}' is required", field)));
        }
    }

    let pool = &state.db().pool;
    let sponsorship = Sponsorship::create(pool, &data).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(sponsorship))))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/sponsorships",
        get(list_sponsorships).post(create_sponsorship),
    )
}
