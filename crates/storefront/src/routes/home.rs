//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::commerce::CommerceError;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::middleware::guard::LOGIN_PATH;
use crate::services::auth::AuthService;
use crate::session::SessionTokenStore;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Display the home page for a logged-in customer.
///
/// The profile comes from the cache, fetched on a miss. A platform that
/// refuses the stored access token ends the session; any other fetch
/// failure still renders the page, without the profile.
///
/// # Errors
///
/// Returns `AppError::Auth` when a refused session cannot be cleared.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    RequireAuth(tokens): RequireAuth,
    session: Session,
) -> Result<Response> {
    let response = match state
        .profiles()
        .get_or_fetch(state.commerce(), &tokens.access_token)
        .await
    {
        Ok(customer) => HomeTemplate {
            name: Some(customer.display_name().to_string()),
            email: Some(customer.email),
        }
        .into_response(),
        Err(CommerceError::Rejected { status: 401, .. }) => {
            warn!("Stored access token refused, ending session");
            let store = SessionTokenStore::new(session);
            let auth = AuthService::new(
                state.commerce(),
                state.profiles(),
                state.submits(),
                &store,
            );
            auth.logout().await?;
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to load profile for home page");
            HomeTemplate {
                email: None,
                name: None,
            }
            .into_response()
        }
    };

    Ok(response)
}
