//! Authentication route handlers for the admin console.
//!
//! Login exchanges credentials for an opaque bearer token via the catalog
//! API and stores it in the session; logout removes it. Authentication
//! failures are reported inline on the form, with no lockout or retry
//! limit.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::CatalogError;
use crate::middleware::{OptionalAdminToken, clear_admin_token, set_admin_token};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub error: Option<String>,
}

/// Render the login page.
///
/// GET /auth/login
#[instrument(skip_all)]
pub async fn login_page(OptionalAdminToken(token): OptionalAdminToken) -> Response {
    // Already signed in: skip straight to the product table
    if token.is_some() {
        return Redirect::to("/products").into_response();
    }

    LoginTemplate {
        username: String::new(),
        error: None,
    }
    .into_response()
}

/// Exchange credentials for a token and start the admin session.
///
/// POST /auth/login
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.catalog().login(&form.username, &form.password).await {
        Ok(token) => {
            if let Err(e) = set_admin_token(&session, &token).await {
                tracing::error!("Failed to store admin token in session: {e}");
                return LoginTemplate {
                    username: form.username,
                    error: Some("Login failed. Please try again.".to_string()),
                }
                .into_response();
            }
            Redirect::to("/products").into_response()
        }
        Err(CatalogError::InvalidCredentials) => LoginTemplate {
            username: form.username,
            error: Some("Invalid username or password".to_string()),
        }
        .into_response(),
        Err(e) => {
            tracing::error!("Admin login request failed: {e}");
            LoginTemplate {
                username: form.username,
                error: Some("Login failed. Please try again.".to_string()),
            }
            .into_response()
        }
    }
}

/// Logout and drop the token.
///
/// POST /auth/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = clear_admin_token(&session).await;

    Redirect::to("/auth/login")
}
