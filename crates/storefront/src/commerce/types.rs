//! Commerce platform request and response types.

use core::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// OAuth token endpoint response.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Only issued for the customer password grant.
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    pub scope: String,
    pub token_type: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Privileged token from the client credentials grant.
///
/// Scoped to customer management and used only to authorize signup.
#[derive(Debug)]
pub struct ServiceToken {
    pub access_token: SecretString,
}

/// Error body returned by the auth and API hosts.
///
/// Auth errors carry `error_description`; API errors usually carry only
/// `message`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub message: Option<String>,
}

impl ErrorResponse {
    /// The most specific human-readable description available.
    #[must_use]
    pub fn into_description(self) -> Option<String> {
        non_blank(self.error_description.or(self.message))
    }

    /// The OAuth `error_description` alone.
    ///
    /// Customer login shows nothing but this; a bare `message` falls back
    /// to the caller's generic text.
    #[must_use]
    pub fn into_oauth_description(self) -> Option<String> {
        non_blank(self.error_description)
    }
}

fn non_blank(description: Option<String>) -> Option<String> {
    description.filter(|description| !description.trim().is_empty())
}

/// Customer profile as returned by the platform.
///
/// Only the identity fields are used; everything else in the payload is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Customer {
    /// Name to greet the customer with, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Response of the customer creation endpoint.
#[derive(Debug, Deserialize)]
pub struct SignUpResponse {
    pub customer: Customer,
}
