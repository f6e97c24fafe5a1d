//! Authentication route handlers.
//!
//! Login, signup and logout against the commerce platform. Submit handlers
//! never redirect on failure: they re-render the form with inline field
//! errors or a form-level banner, keeping everything but the password.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use emporium_core::validation::latest_local_date;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::commerce::GENERIC_ERROR_MESSAGE;
use crate::error::{auth_status, report};
use crate::filters;
use crate::forms::countries::{self, CountryOption};
use crate::forms::{FieldErrors, LoginForm, SignupForm};
use crate::middleware::RequireAnonymous;
use crate::middleware::guard::{HOME_PATH, LOGIN_PATH};
use crate::services::auth::{AuthError, AuthService};
use crate::session::SessionTokenStore;
use crate::state::AppState;

/// Banner shown when the platform refuses a login without a description.
pub const LOGIN_ERROR_MESSAGE: &str = "Login error";

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate, Default)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub errors: FieldErrors,
    pub banner: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub form: SignupForm,
    pub errors: FieldErrors,
    pub banner: Option<String>,
    pub billing_countries: Vec<CountryOption>,
    pub shipping_countries: Vec<CountryOption>,
}

impl SignupTemplate {
    /// Render `form` with its country selections, dropping the password.
    #[must_use]
    pub fn new(mut form: SignupForm, errors: FieldErrors, banner: Option<String>) -> Self {
        form.password.clear();
        let billing_countries = countries::options(&form.country);
        let shipping_countries = countries::options(&form.country_shipping);

        Self {
            form,
            errors,
            banner,
            billing_countries,
            shipping_countries,
        }
    }
}

/// Turn a failed login or signup into a status and banner, reporting
/// server-side faults.
fn failure(err: &AuthError, rejected: StatusCode, fallback: &str) -> (StatusCode, String) {
    if err.is_server_fault() {
        report(err);
    } else {
        warn!(error = %err, "Auth submit refused");
    }
    (auth_status(err, rejected), err.user_message(fallback))
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(_: RequireAnonymous) -> impl IntoResponse {
    LoginTemplate::default()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    _: RequireAnonymous,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = match form.validate(latest_local_date(Utc::now())) {
        Ok(email) => email,
        Err(errors) => {
            let page = LoginTemplate {
                email: form.email,
                errors,
                banner: None,
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    let tokens = SessionTokenStore::new(session);
    let auth = AuthService::new(
        state.commerce(),
        state.profiles(),
        state.submits(),
        &tokens,
    );

    match auth.login(&email, &form.password).await {
        Ok(_) => {
            info!("Login succeeded");
            Redirect::to(HOME_PATH).into_response()
        }
        Err(e) => {
            let (status, banner) = failure(&e, StatusCode::UNAUTHORIZED, LOGIN_ERROR_MESSAGE);
            let page = LoginTemplate {
                email: form.email,
                errors: FieldErrors::new(),
                banner: Some(banner),
            };
            (status, page).into_response()
        }
    }
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(_: RequireAnonymous) -> impl IntoResponse {
    SignupTemplate::new(SignupForm::default(), FieldErrors::new(), None)
}

/// Handle signup form submission.
///
/// A checked `sameAsBilling` overwrites whatever shipping values were sent.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    _: RequireAnonymous,
    session: Session,
    Form(mut form): Form<SignupForm>,
) -> Response {
    form.sync_shipping();

    let draft = match form.to_draft(latest_local_date(Utc::now())) {
        Ok(draft) => draft,
        Err(errors) => {
            let page = SignupTemplate::new(form, errors, None);
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    let tokens = SessionTokenStore::new(session);
    let auth = AuthService::new(
        state.commerce(),
        state.profiles(),
        state.submits(),
        &tokens,
    );

    match auth.signup(&draft).await {
        Ok(_) => {
            info!("Signup succeeded");
            Redirect::to(HOME_PATH).into_response()
        }
        Err(e) => {
            let (status, banner) = failure(&e, StatusCode::BAD_REQUEST, GENERIC_ERROR_MESSAGE);
            let page = SignupTemplate::new(form, FieldErrors::new(), Some(banner));
            (status, page).into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Always ends on the login page; a session that cannot be cleared is
/// reported but still flushed.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    let tokens = SessionTokenStore::new(session);
    let auth = AuthService::new(
        state.commerce(),
        state.profiles(),
        state.submits(),
        &tokens,
    );

    if let Err(e) = auth.logout().await {
        report(&e);
    }
    if let Err(e) = tokens.flush().await {
        report(&e);
    }

    Redirect::to(LOGIN_PATH)
}
