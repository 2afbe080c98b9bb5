//! Session key constants.

/// Keys under which the admin console stores values in the session.
pub mod session_keys {
    /// The opaque admin bearer token. Presence of this key is the whole
    /// "admin session active" contract; the token is never validated
    /// client-side beyond existence and carries no expiry.
    pub const ADMIN_TOKEN: &str = baba_boutique_core::cart::ADMIN_TOKEN_KEY;

    /// One-shot notification consumed by the next page render.
    pub const FLASH: &str = "flash";
}
