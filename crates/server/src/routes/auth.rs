//! Session-based admin authentication.
//!
//! Passwords are bcrypt-verified; issued session tokens are stored hashed
//! and returned to the browser as an HttpOnly cookie.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use db::models::user::{Session, User};
use db::services::AuthService;
use serde::{Deserialize, Serialize};
use utils::response::ApiResponse;

use crate::{
    AppState,
    error::ApiError,
    middleware::{access_control::extract_session_token, get_current_user},
};

const SESSION_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    pub session_id: String,
}

fn profile(user: &User) -> UserProfile {
    UserProfile {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        is_admin: user.is_admin == 1,
    }
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let pool = &state.db().pool;

    let user = User::find_by_username(pool, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let is_valid = AuthService::verify_password(&req.password, &user.password_hash)
        .map_err(|e| ApiError::InternalError(format!("Password verification error: {}", e)))?;
    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    User::record_login(pool, user.id).await?;

    let token = AuthService::generate_session_token();
    let token_hash = AuthService::hash_session_token(&token);
    let expires_at = Utc::now() + Duration::days(SESSION_DAYS);
    Session::create(pool, user.id, &token_hash, expires_at).await?;

    let body = ApiResponse::success(LoginResponse {
        user: profile(&user),
        session_id: token.clone(),
    });

    let cookie = format!(
        "session_id={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        token,
        SESSION_DAYS * 24 * 60 * 60
    );
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let pool = &state.db().pool;

    let cookie_header = headers.get("cookie").and_then(|h| h.to_str().ok());
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());

    if let Some(token) = extract_session_token(auth_header, cookie_header) {
        let token_hash = AuthService::hash_session_token(&token);
        Session::delete_by_token_hash(pool, &token_hash).await?;
    }

    let clear = "session_id=; HttpOnly; Path=/; Max-Age=0".to_string();
    let body = ApiResponse::success(());
    Ok(([(header::SET_COOKIE, clear)], Json(body)).into_response())
}

async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
    let cookie_header = headers.get("cookie").and_then(|h| h.to_str().ok());

    let user = get_current_user(&state, auth_header, cookie_header).await?;

    Ok(Json(ApiResponse::success(profile(&user))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}
