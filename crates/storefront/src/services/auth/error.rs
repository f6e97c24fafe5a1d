//! Authentication error types.

use thiserror::Error;

use crate::commerce::CommerceError;
use crate::services::submit::SubmitKind;
use crate::session::SessionStoreError;

/// Message shown when the same form is submitted twice before the first
/// submit settles.
pub const IN_PROGRESS_MESSAGE: &str = "A request is already in progress.";

/// Errors that can occur during login, signup or logout.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Another submit for the same email is still pending.
    #[error("{0} already in progress")]
    InProgress(SubmitKind),

    /// The commerce platform refused or failed the request.
    #[error("Commerce error: {0}")]
    Commerce(#[from] CommerceError),

    /// Tokens could not be read from or written to the session.
    #[error("Session error: {0}")]
    Session(#[from] SessionStoreError),
}

impl AuthError {
    /// Banner text for the form that triggered the error.
    #[must_use]
    pub fn user_message(&self, rejected_fallback: &str) -> String {
        match self {
            Self::InProgress(_) => IN_PROGRESS_MESSAGE.to_string(),
            Self::Commerce(err) => err.user_message(rejected_fallback),
            Self::Session(_) => crate::commerce::GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the failure is on our side or the network, rather than a
    /// decision by the platform or the customer.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        match self {
            Self::InProgress(_) => false,
            Self::Commerce(err) => !err.is_rejection(),
            Self::Session(_) => true,
        }
    }
}
