//! HTTP middleware and extractors for the admin console.

pub mod auth;
pub mod session;

pub use auth::{OptionalAdminToken, RequireAdminToken, clear_admin_token, set_admin_token};
pub use session::create_session_layer;
