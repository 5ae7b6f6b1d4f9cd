pub mod auth_service;
pub mod bulk_actions;
pub mod reporting;
pub mod seed;
pub mod workflow;

pub use auth_service::AuthService;
