//! Session key constants.

/// Keys under which the storefront stores values in the session.
pub mod session_keys {
    /// The serialized cart ledger (see `baba_boutique_core::cart`).
    pub const CART: &str = baba_boutique_core::cart::CART_KEY;

    /// One-shot notification consumed by the next page render.
    pub const FLASH: &str = "flash";
}
