//! Unified error handling with Sentry integration.
//!
//! Form handlers render their own failures inline; `AppError` covers the
//! rest (unknown fragments, a home page whose session cannot be ended) and
//! captures server errors to Sentry before responding.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::commerce::CommerceError;
use crate::services::auth::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication flow failed outside a form submit.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => auth_status(err, StatusCode::BAD_REQUEST),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    const fn is_server_fault(&self) -> bool {
        match self {
            Self::Auth(err) => err.is_server_fault(),
            Self::NotFound(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            report(&self);
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Auth(err) => err.user_message(crate::commerce::GENERIC_ERROR_MESSAGE),
            Self::NotFound(_) => "Not found".to_string(),
        };

        (self.status(), message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Status for a commerce failure; platform rejections use `rejected`.
#[must_use]
pub const fn commerce_status(err: &CommerceError, rejected: StatusCode) -> StatusCode {
    if err.is_rejection() {
        rejected
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// Status for an auth failure; platform rejections use `rejected`.
#[must_use]
pub const fn auth_status(err: &AuthError, rejected: StatusCode) -> StatusCode {
    match err {
        AuthError::InProgress(_) => StatusCode::CONFLICT,
        AuthError::Commerce(err) => commerce_status(err, rejected),
        AuthError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Capture a server-side failure to Sentry and log it with the event id.
pub fn report(err: &(dyn std::error::Error + 'static)) {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        sentry_event_id = %event_id,
        "Request error"
    );
}

/// Set the Sentry user context from a customer ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the customer.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("auth", "Customer logged in", Some(&[("customer_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::submit::SubmitKind;
    use crate::session::SessionStoreError;

    fn rejected(status: u16) -> CommerceError {
        CommerceError::Rejected {
            status,
            description: Some("Customer account with the given credentials not found.".into()),
        }
    }

    fn session_failure() -> AuthError {
        let err = serde_json::from_str::<String>("not json").unwrap_err();
        AuthError::Session(SessionStoreError::from(
            tower_sessions::session::Error::from(err),
        ))
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("zip".to_string());
        assert_eq!(err.to_string(), "Not found: zip");

        let err = AppError::Auth(AuthError::InProgress(SubmitKind::Login));
        assert_eq!(err.to_string(), "Auth error: login already in progress");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InProgress(SubmitKind::Login))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::Commerce(
                CommerceError::UnexpectedResponse("no body".into())
            ))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_session_failure_hides_details() {
        let err = AppError::from(session_failure());
        assert!(err.is_server_fault());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], crate::commerce::GENERIC_ERROR_MESSAGE.as_bytes());
    }

    #[test]
    fn test_rejections_use_caller_status() {
        let err = AuthError::Commerce(rejected(400));
        assert_eq!(
            auth_status(&err, StatusCode::UNAUTHORIZED),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            commerce_status(&rejected(400), StatusCode::BAD_REQUEST),
            StatusCode::BAD_REQUEST
        );
    }
}
