//! Commerce platform API client.
//!
//! # Architecture
//!
//! - The commerce platform is the source of truth for customers and tokens;
//!   nothing is stored locally beyond the session
//! - Plain `reqwest` calls: form-encoded OAuth grants, JSON customer endpoints
//! - No retries: every failure surfaces once, at the call site, as a single
//!   user-facing message
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST {auth}/oauth/{project}/customers/token` - customer password grant
//! - `POST {auth}/oauth/token` - client credentials grant (service token)
//!
//! ## API
//! - `POST {api}/{project}/customers` - customer signup
//! - `GET  {api}/{project}/me` - current customer profile
//!
//! # Example
//!
//! ```rust,ignore
//! use emporium_storefront::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(&config.commerce)?;
//!
//! let tokens = client.login_customer("jane@example.com", "Abcdefg1").await?;
//! let customer = client.fetch_me(&tokens.access_token).await?;
//! ```

mod client;
pub mod types;

pub use client::CommerceClient;
pub use types::*;

use thiserror::Error;

/// Message shown when the failure carries no upstream description.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Errors that can occur when interacting with the commerce platform.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The platform answered with an unexpected status.
    #[error("Rejected with status {status}: {}", .description.as_deref().unwrap_or("(no description)"))]
    Rejected {
        /// HTTP status code returned upstream.
        status: u16,
        /// `error_description` or `message` from the error body, if any.
        description: Option<String>,
    },

    /// The response was successful but missing required data.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl CommerceError {
    /// Convert the failure into the single message shown to the customer.
    ///
    /// A rejection carries the platform's own description when present,
    /// otherwise `rejected_fallback`. Transport and parsing failures never
    /// expose details and always read as [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn user_message(&self, rejected_fallback: &str) -> String {
        match self {
            Self::Rejected {
                description: Some(description),
                ..
            } => description.clone(),
            Self::Rejected {
                description: None, ..
            } => rejected_fallback.to_string(),
            Self::Http(_) | Self::Parse(_) | Self::UnexpectedResponse(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Whether the platform itself refused the request (as opposed to the
    /// request never completing).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = CommerceError::Rejected {
            status: 400,
            description: Some("Customer account with the given credentials not found.".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Rejected with status 400: Customer account with the given credentials not found."
        );

        let err = CommerceError::Rejected {
            status: 503,
            description: None,
        };
        assert_eq!(err.to_string(), "Rejected with status 503: (no description)");
    }

    #[test]
    fn test_user_message_prefers_upstream_description() {
        let err = CommerceError::Rejected {
            status: 400,
            description: Some("There is already an existing customer.".to_string()),
        };
        assert_eq!(
            err.user_message(GENERIC_ERROR_MESSAGE),
            "There is already an existing customer."
        );
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = CommerceError::Rejected {
            status: 401,
            description: None,
        };
        assert_eq!(err.user_message("Login error"), "Login error");

        let err = CommerceError::UnexpectedResponse("missing refresh_token".to_string());
        assert_eq!(err.user_message("Login error"), GENERIC_ERROR_MESSAGE);
        assert!(!err.is_rejection());
    }
}
