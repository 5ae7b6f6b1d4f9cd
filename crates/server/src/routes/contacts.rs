//! Public contact form plus the bulk status/delete operations the admin UI
//! issues against the whole collection.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use db::models::contact::{Contact, ContactStatus, CreateContact};
use serde::{Deserialize, Serialize};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusUpdate {
    pub ids: Vec<Uuid>,
    pub status: ContactStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDelete {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedCount {
    pub updated_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCount {
    pub deleted_count: u64,
}

async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Contact>>>, ApiError> {
    let pool = &state.db().pool;
    let contacts = Contact::find_recent(pool, query.limit.unwrap_or(100)).await?;
    Ok(Json(ApiResponse::success(contacts)))
}

async fn create_contact(
    State(state): State<AppState>,
    Json(data): Json<CreateContact>,
) -> Result<impl IntoResponse, ApiError> {
    for (field, value) in [
        ("name", &data.name),
        ("email", &data.email),
        ("subject", &data.subject),
        ("message", &data.message),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("'{}' is required", field)));
        }
    }

    let pool = &state.db().pool;
    let contact = Contact::create(pool, &data).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(contact))))
}

async fn bulk_update_status(
    State(state): State<AppState>,
    Json(update): Json<BulkStatusUpdate>,
) -> Result<Json<ApiResponse<UpdatedCount>>, ApiError> {
    if update.ids.is_empty() {
        return Err(ApiError::BadRequest("'ids' must be a non-empty list".into()));
    }

    let pool = &state.db().pool;
    let updated_count = Contact::bulk_update_status(pool, &update.ids, update.status).await?;
    Ok(Json(ApiResponse::success(UpdatedCount { updated_count })))
}

async fn bulk_delete(
    State(state): State<AppState>,
    Json(request): Json<BulkDelete>,
) -> Result<Json<ApiResponse<DeletedCount>>, ApiError> {
    if request.ids.is_empty() {
        return Err(ApiError::BadRequest("'ids' must be a non-empty list".into()));
    }

    let pool = &state.db().pool;
    let deleted_count = Contact::bulk_delete(pool, &request.ids).await?;
    Ok(Json(ApiResponse::success(DeletedCount { deleted_count })))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/contacts",
        get(list_contacts)
            .post(create_contact)
            .put(bulk_update_status)
            .delete(bulk_delete),
    )
}
