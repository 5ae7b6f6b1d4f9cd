use axum::{Router, middleware, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::{AppState, middleware as app_middleware};

pub mod abstracts;
pub mod admin;
pub mod auth;
pub mod contacts;
pub mod health;
pub mod payments;
pub mod registrations;
pub mod speakers;
pub mod sponsorships;

pub fn router(state: AppState) -> Router {
    // Admin routes with require_admin applied BEFORE state
    let admin_routes = admin::router().layer(middleware::from_fn_with_state(
        state.clone(),
        app_middleware::require_admin,
    ));

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .merge(registrations::router())
        .merge(contacts::router())
        .merge(abstracts::router())
        .merge(speakers::router())
        .merge(sponsorships::router())
        .merge(payments::router())
        .merge(auth::router())
        .nest("/admin", admin_routes)
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
