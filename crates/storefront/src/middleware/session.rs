//! Session middleware configuration.
//!
//! The session stands in for the browser profile's durable storage: one
//! long-lived cookie per profile, shared by every tab, holding the cart
//! ledger and one-shot flash messages. Backed by the in-process memory
//! store - the catalog API owns all real persistence.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bb_session";

/// Session expiry in days. Carts linger the way profile storage does.
const SESSION_EXPIRY_DAYS: i64 = 30;

/// Create the session layer with the in-process memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::days(SESSION_EXPIRY_DAYS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
