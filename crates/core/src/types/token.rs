//! OAuth token types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Access and refresh credentials issued to a logged-in customer.
///
/// Validity is decided only by the commerce platform accepting the access
/// token; no expiry is tracked locally.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer token for customer-scoped API calls.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
}

impl TokenPair {
    /// Create a new token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
