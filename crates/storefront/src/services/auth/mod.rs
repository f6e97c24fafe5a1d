//! Authentication service.
//!
//! Orchestrates the customer login, signup and logout flows on top of the
//! commerce client, the token store and the profile cache.
//!
//! # Flows
//!
//! - **Login**: claim the submit slot, exchange credentials for a token
//!   pair, store it, warm the profile cache.
//! - **Signup**: claim the submit slot, create the customer with a service
//!   token, then log in with the same credentials as above.
//! - **Logout**: invalidate the cached profile and remove both tokens.

mod error;

pub use error::{AuthError, IN_PROGRESS_MESSAGE};

use emporium_core::{Email, SignupDraft, TokenPair};
use tracing::{info, instrument, warn};

use crate::commerce::{CommerceClient, Customer};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::services::profile::ProfileCache;
use crate::services::submit::{SubmitGuard, SubmitKind};
use crate::session::TokenStore;

/// Authentication service over a single request's token store.
pub struct AuthService<'a, S> {
    commerce: &'a CommerceClient,
    profiles: &'a ProfileCache,
    submits: &'a SubmitGuard,
    tokens: &'a S,
}

impl<'a, S: TokenStore> AuthService<'a, S> {
    #[must_use]
    pub const fn new(
        commerce: &'a CommerceClient,
        profiles: &'a ProfileCache,
        submits: &'a SubmitGuard,
        tokens: &'a S,
    ) -> Self {
        Self {
            commerce,
            profiles,
            submits,
            tokens,
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Log a customer in and store their tokens.
    ///
    /// Returns the customer's profile when it could be fetched; a failed
    /// profile fetch does not fail the login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InProgress` if a login for this email is pending,
    /// `AuthError::Commerce` if the platform refuses the credentials or is
    /// unreachable, and `AuthError::Session` if the tokens cannot be stored.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<Customer>, AuthError> {
        let _permit = self
            .submits
            .try_acquire(SubmitKind::Login, email)
            .ok_or(AuthError::InProgress(SubmitKind::Login))?;

        self.establish(email, password).await
    }

    // =========================================================================
    // Signup
    // =========================================================================

    /// Create a customer account, then log the new customer in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InProgress` if a signup for this email is pending,
    /// `AuthError::Commerce` if creation or the follow-up login fails, and
    /// `AuthError::Session` if the tokens cannot be stored.
    #[instrument(skip(self, draft), fields(email = %draft.email))]
    pub async fn signup(&self, draft: &SignupDraft) -> Result<Option<Customer>, AuthError> {
        let _permit = self
            .submits
            .try_acquire(SubmitKind::Signup, &draft.email)
            .ok_or(AuthError::InProgress(SubmitKind::Signup))?;

        let customer = self.commerce.sign_up_customer(draft).await?;
        info!(customer_id = %customer.id, "Customer signed up");
        add_breadcrumb("auth", "Customer signed up", None);

        self.establish(&draft.email, &draft.password).await
    }

    // =========================================================================
    // Logout
    // =========================================================================

    /// Forget the current customer.
    ///
    /// Safe to call without a logged-in customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the token store fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Some(tokens) = self.tokens.get().await? {
            self.profiles.invalidate(&tokens.access_token).await;
        }
        self.tokens.clear().await?;

        clear_sentry_user();
        add_breadcrumb("auth", "Customer logged out", None);
        Ok(())
    }

    /// Exchange credentials for tokens, store them and warm the profile.
    async fn establish(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<Customer>, AuthError> {
        let tokens: TokenPair = self
            .commerce
            .login_customer(email.as_str(), password)
            .await?;
        self.tokens.set(&tokens).await?;

        let profile = match self
            .profiles
            .get_or_fetch(self.commerce, &tokens.access_token)
            .await
        {
            Ok(customer) => {
                set_sentry_user(&customer.id, Some(&customer.email));
                Some(customer)
            }
            Err(e) => {
                warn!(error = %e, "Profile fetch after login failed");
                None
            }
        };

        add_breadcrumb("auth", "Customer logged in", None);
        Ok(profile)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use emporium_core::Address;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::commerce::CommerceError;
    use crate::config::CommerceConfig;
    use crate::session::MemoryTokenStore;

    struct Harness {
        commerce: CommerceClient,
        profiles: ProfileCache,
        submits: SubmitGuard,
        tokens: MemoryTokenStore,
    }

    impl Harness {
        fn new(server: &MockServer) -> Self {
            Self::with_base(&server.uri())
        }

        fn with_base(base: &str) -> Self {
            let commerce = CommerceClient::new(&CommerceConfig {
                project_key: "emporium-test".to_string(),
                auth_url: base.to_string(),
                api_url: base.to_string(),
                client_id: "storefront".to_string(),
                client_secret: SecretString::from("s3cr3t"),
                timeout: Duration::from_secs(5),
            })
            .unwrap();

            Self {
                commerce,
                profiles: ProfileCache::new(),
                submits: SubmitGuard::new(),
                tokens: MemoryTokenStore::new(),
            }
        }

        fn service(&self) -> AuthService<'_, MemoryTokenStore> {
            AuthService::new(&self.commerce, &self.profiles, &self.submits, &self.tokens)
        }
    }

    fn email() -> Email {
        Email::parse("jane@example.com").unwrap()
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/oauth/emporium-test/customers/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at-1",
                "refresh_token": "rt-1",
                "expires_in": 172_800,
                "scope": "manage_my_profile:emporium-test",
                "token_type": "Bearer"
            })))
            .mount(server)
            .await;
    }

    async fn mount_me(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/emporium-test/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c-1",
                "email": "jane@example.com"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_stores_tokens_and_warms_profile() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        mount_me(&server).await;
        let harness = Harness::new(&server);

        let profile = harness.service().login(&email(), "Abcdefg1").await.unwrap();

        assert_eq!(profile.unwrap().id, "c-1");
        assert_eq!(
            harness.tokens.get().await.unwrap(),
            Some(TokenPair::new("at-1", "rt-1"))
        );
        assert!(harness.profiles.get("at-1").await.is_some());
        assert_eq!(harness.submits.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_login_survives_profile_failure() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/emporium-test/me"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let harness = Harness::new(&server);

        let profile = harness.service().login(&email(), "Abcdefg1").await.unwrap();

        assert!(profile.is_none());
        assert!(harness.tokens.get().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejected_login_stores_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/emporium-test/customers/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_customer_account_credentials",
                "error_description": "Customer account with the given credentials not found."
            })))
            .mount(&server)
            .await;
        let harness = Harness::new(&server);

        let err = harness
            .service()
            .login(&email(), "Wrongpass1")
            .await
            .unwrap_err();

        assert!(!err.is_server_fault());
        assert_eq!(
            err.user_message("Login error"),
            "Customer account with the given credentials not found."
        );
        assert!(harness.tokens.get().await.unwrap().is_none());
        assert_eq!(harness.submits.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_login_while_pending_is_rejected() {
        let server = MockServer::start().await;
        let harness = Harness::new(&server);
        let _pending = harness
            .submits
            .try_acquire(SubmitKind::Login, &email())
            .unwrap();

        let err = harness
            .service()
            .login(&email(), "Abcdefg1")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InProgress(SubmitKind::Login)));
        assert_eq!(err.user_message("Login error"), IN_PROGRESS_MESSAGE);
    }

    #[tokio::test]
    async fn test_signup_creates_then_logs_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "svc-token",
                "expires_in": 172_800,
                "scope": "manage_customers:emporium-test",
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/emporium-test/customers"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "customer": { "id": "c-1", "email": "jane@example.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_login(&server).await;
        mount_me(&server).await;
        let harness = Harness::new(&server);

        let draft = SignupDraft {
            email: email(),
            password: "Abcdefg1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
            billing_address: Address::new("Main St", "10115", "Berlin", "de"),
            shipping_address: Address::new("Main St", "10115", "Berlin", "de"),
            default_billing: false,
            default_shipping: false,
        };

        let profile = harness.service().signup(&draft).await.unwrap();

        assert_eq!(profile.unwrap().email, "jane@example.com");
        assert!(harness.tokens.get().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_and_profile() {
        let server = MockServer::start().await;
        let harness = Harness::new(&server);
        harness
            .tokens
            .set(&TokenPair::new("at-1", "rt-1"))
            .await
            .unwrap();
        harness
            .profiles
            .insert(
                "at-1",
                Customer {
                    id: "c-1".to_string(),
                    email: "jane@example.com".to_string(),
                    first_name: None,
                    last_name: None,
                },
            )
            .await;

        harness.service().logout().await.unwrap();

        assert!(harness.tokens.get().await.unwrap().is_none());
        assert!(harness.profiles.get("at-1").await.is_none());
    }

    #[tokio::test]
    async fn test_network_failure_is_server_fault() {
        // Port 1 is never served, so the connection is refused
        let harness = Harness::with_base("http://127.0.0.1:1");

        let err = harness
            .service()
            .login(&email(), "Abcdefg1")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Commerce(CommerceError::Http(_))));
        assert!(err.is_server_fault());
        assert_eq!(
            err.user_message("Login error"),
            "An unexpected error occurred."
        );
    }
}
