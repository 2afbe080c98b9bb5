//! Request-scoped models and session helpers.

pub mod flash;
pub mod session;

pub use flash::{Flash, FlashLevel, set_flash, take_flash};
pub use session::session_keys;
