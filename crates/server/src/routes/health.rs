use axum::{Json, response::Json as ResponseJson};
use serde_json::{Value, json};
use utils::response::ApiResponse;

pub async fn health_check() -> ResponseJson<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({ "status": "ok" })))
}
