//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (logged in)
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /login                  - Login page (anonymous)
//! POST /login                  - Login action (anonymous)
//! GET  /signup                 - Signup page (anonymous)
//! POST /signup                 - Signup action (anonymous)
//! POST /logout                 - Logout action
//!
//! # Fragments (enhancement script)
//! POST /signup/shipping        - Shipping fieldset after an address edit
//! POST /validate/{field}       - Error message for one input
//!
//! *                            - 404 page
//! ```

pub mod auth;
pub mod fragments;
pub mod home;
pub mod not_found;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{RateLimiterLayer, auth_rate_limiter, fragment_rate_limiter};
use crate::state::AppState;

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/login", get(auth::login_page))
        .route("/signup", get(auth::signup_page))
        .route("/logout", post(auth::logout))
        .route("/health", get(health))
}

/// Create the auth submit routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
}

/// Create the fragment routes router.
pub fn fragment_routes() -> Router<AppState> {
    Router::new()
        .route("/signup/shipping", post(fragments::shipping))
        .route("/validate/{field}", post(fragments::validate))
}

/// Create all routes for the storefront, without rate limits.
pub fn routes() -> Router<AppState> {
    assemble(auth_routes(), fragment_routes())
}

/// Create all routes with per-client rate limits on auth submits and
/// fragments.
pub fn rate_limited_routes() -> Router<AppState> {
    assemble(
        limited(auth_routes(), auth_rate_limiter()),
        limited(fragment_routes(), fragment_rate_limiter()),
    )
}

fn limited(router: Router<AppState>, limiter: RateLimiterLayer) -> Router<AppState> {
    router.layer(limiter)
}

// GET and POST of one path live in different routers; merging joins their
// method routers.
fn assemble(auth: Router<AppState>, fragments: Router<AppState>) -> Router<AppState> {
    page_routes()
        .merge(auth)
        .merge(fragments)
        .fallback(not_found::not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the commerce
/// platform.
async fn health() -> &'static str {
    "ok"
}
