//! Authentication extractors for the admin console.
//!
//! The whole admin session contract is the presence of the opaque bearer
//! token under the `adminToken` key: no expiry, no refresh, no client-side
//! validation beyond existence. Any admin-only view extracts the token and
//! redirects to the login page when it is absent.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::session_keys;

/// Extractor that requires an admin token to be present.
///
/// If no token is stored, returns a redirect to the login page for HTML
/// requests, or 401 Unauthorized for fragment requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminToken(token): RequireAdminToken,
/// ) -> impl IntoResponse {
///     // token is opaque; its presence is the authorization
/// }
/// ```
pub struct RequireAdminToken(pub String);

/// Error returned when an admin token is required but absent.
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for fragment requests).
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminToken
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        // Presence of the token is the entire check
        let token: String = session
            .get(session_keys::ADMIN_TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                // Fragment requests get a bare 401 instead of a redirect
                let is_fragment = parts.headers.contains_key("HX-Request");
                if is_fragment {
                    AdminAuthRejection::Unauthorized
                } else {
                    AdminAuthRejection::RedirectToLogin
                }
            })?;

        Ok(Self(token))
    }
}

/// Extractor that optionally reads the admin token.
///
/// Unlike `RequireAdminToken`, this does not reject the request when the
/// token is absent. The login page uses it to skip straight to the product
/// table for admins who are already signed in.
pub struct OptionalAdminToken(pub Option<String>);

impl<S> FromRequestParts<S> for OptionalAdminToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<String>(session_keys::ADMIN_TOKEN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(token))
    }
}

/// Helper to store the admin token in the session after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ADMIN_TOKEN, token).await
}

/// Helper to remove the admin token from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin_token(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<String>(session_keys::ADMIN_TOKEN)
        .await?;
    Ok(())
}
