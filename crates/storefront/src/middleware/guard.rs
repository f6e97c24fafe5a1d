//! Route guards.
//!
//! Every page declares who may see it; [`decide`] turns that and the
//! presence of a stored token into render-or-redirect. The extractors apply
//! it on every request, so logging in or out takes effect on the next
//! navigation without any cached state.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use emporium_core::TokenPair;
use tower_sessions::Session;

use crate::session::{SessionTokenStore, TokenStore};

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Path of the home page.
pub const HOME_PATH: &str = "/";

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Logged-in customers only.
    Authenticated,
    /// Visitors without a session only (login, signup).
    Anonymous,
    /// Everyone.
    Public,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(&'static str),
}

/// Decide whether a route with `access` renders for this visitor.
#[must_use]
pub const fn decide(access: RouteAccess, has_token: bool) -> GuardDecision {
    match (access, has_token) {
        (RouteAccess::Authenticated, false) => GuardDecision::Redirect(LOGIN_PATH),
        (RouteAccess::Anonymous, true) => GuardDecision::Redirect(HOME_PATH),
        _ => GuardDecision::Render,
    }
}

/// Rejection returned by the guard extractors.
#[derive(Debug)]
pub enum GuardRejection {
    Redirect(&'static str),
    /// The session layer is not installed on this route.
    SessionUnavailable,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(to) => Redirect::to(to).into_response(),
            Self::SessionUnavailable => {
                tracing::error!("Session layer missing for guarded route");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Read the stored token pair from the request's session.
///
/// A session read failure counts as "no token".
async fn stored_tokens(parts: &Parts) -> Result<Option<TokenPair>, GuardRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(GuardRejection::SessionUnavailable)?;

    Ok(SessionTokenStore::new(session)
        .get()
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to read tokens from session"))
        .ok()
        .flatten())
}

/// Extractor for pages that require a logged-in customer.
///
/// Redirects to the login page when no token is stored.
///
/// # Example
///
/// ```rust,ignore
/// async fn home(RequireAuth(tokens): RequireAuth) -> impl IntoResponse {
///     // tokens.access_token authorizes customer-scoped calls
/// }
/// ```
pub struct RequireAuth(pub TokenPair);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tokens = stored_tokens(parts).await?;

        match (decide(RouteAccess::Authenticated, tokens.is_some()), tokens) {
            (GuardDecision::Render, Some(tokens)) => Ok(Self(tokens)),
            (GuardDecision::Redirect(to), _) => Err(GuardRejection::Redirect(to)),
            (GuardDecision::Render, None) => Err(GuardRejection::Redirect(LOGIN_PATH)),
        }
    }
}

/// Extractor for pages only visitors without a session may see.
///
/// Redirects logged-in customers to the home page.
pub struct RequireAnonymous;

impl<S> FromRequestParts<S> for RequireAnonymous
where
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tokens = stored_tokens(parts).await?;

        match decide(RouteAccess::Anonymous, tokens.is_some()) {
            GuardDecision::Render => Ok(Self),
            GuardDecision::Redirect(to) => Err(GuardRejection::Redirect(to)),
        }
    }
}
