//! One-shot flash notifications.
//!
//! Pages surface transient outcomes ("Order placed successfully!",
//! "Failed to place order") as a toast rendered once on the next page view.
//! The message is stored in the session and removed when taken, so a reload
//! never replays it.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session_keys;

/// Notification severity, mapped to a toast style in the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

impl FlashLevel {
    /// CSS class suffix for the toast.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A one-shot notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Queue a notification for the next page render.
///
/// Failures are logged and swallowed: losing a toast must never fail the
/// action that produced it.
pub async fn set_flash(session: &Session, level: FlashLevel, message: impl Into<String>) {
    let flash = Flash {
        level,
        message: message.into(),
    };
    if let Err(e) = session.insert(session_keys::FLASH, &flash).await {
        tracing::warn!("Failed to store flash message: {e}");
    }
}

/// Take the pending notification, if any, removing it from the session.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}
