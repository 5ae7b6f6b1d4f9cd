pub mod access_control;

pub use access_control::{AccessContext, get_current_user, require_admin};
