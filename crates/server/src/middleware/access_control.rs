use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use db::models::user::User;
use db::services::AuthService;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Identity attached to authenticated requests by the auth middleware.
#[derive(Debug, Clone)]
pub struct AccessContext {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub is_active: bool,
}

impl AccessContext {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if !self.is_admin {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }
        if !self.is_active {
            return Err(ApiError::Forbidden("User account is inactive".to_string()));
        }
        Ok(())
    }
}

impl From<&User> for AccessContext {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin == 1,
            is_active: user.is_active == 1,
        }
    }
}

/// Pull the session token out of a cookie header or a bearer token.
pub fn extract_session_token(
    auth_header: Option<&str>,
    cookie_header: Option<&str>,
) -> Option<String> {
    cookie_header
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                cookie
                    .trim()
                    .strip_prefix("session_id=")
                    .map(|t| t.to_string())
            })
        })
        .or_else(|| {
            auth_header
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|t| t.to_string())
        })
}

/// Resolve the current user from a session cookie or a bearer token.
/// Session tokens are stored hashed, so the presented token is hashed
/// before lookup.
pub async fn get_current_user(
    state: &AppState,
    auth_header: Option<&str>,
    cookie_header: Option<&str>,
) -> Result<User, ApiError> {
    let pool = &state.db().pool;

    if let Some(token) = extract_session_token(auth_header, cookie_header) {
        let token_hash = AuthService::hash_session_token(&token);
        if let Some(user) = User::find_by_session_token_hash(pool, &token_hash).await? {
            return Ok(user);
        }
    }

    Err(ApiError::Unauthorized(
        "Missing or invalid authentication".to_string(),
    ))
}

/// Middleware guarding the admin surface.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    let cookie_header = req.headers().get("cookie").and_then(|h| h.to_str().ok());

    match get_current_user(&state, auth_header, cookie_header).await {
        Ok(user) => {
            let context = AccessContext::from(&user);
            if context.require_admin().is_ok() {
                req.extensions_mut().insert(context);
                Ok(next.run(req).await)
            } else {
                Err(StatusCode::FORBIDDEN)
            }
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}
