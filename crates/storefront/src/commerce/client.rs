use std::sync::Arc;

use emporium_core::{SignupDraft, TokenPair};
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::CommerceError;
use super::types::{Customer, ErrorResponse, ServiceToken, SignUpResponse, TokenResponse};
use crate::config::CommerceConfig;

const USER_AGENT: &str = concat!("Emporium/", env!("CARGO_PKG_VERSION"));

// ─────────────────────────────────────────────────────────────────────────────
// Commerce Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the commerce platform's auth and customer APIs.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    project_key: String,
    auth_url: String,
    api_url: String,
    client_id: String,
    client_secret: SecretString,
}

impl CommerceClient {
    /// Create a new commerce API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CommerceConfig) -> Result<Self, CommerceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                project_key: config.project_key.clone(),
                auth_url: config.auth_url.clone(),
                api_url: config.api_url.clone(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
            }),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // OAuth
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange customer credentials for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Rejected`] for any non-200 answer (wrong
    /// credentials included), or a transport/parse error. The rejection
    /// carries the OAuth `error_description` only.
    #[instrument(skip(self, password))]
    pub async fn login_customer(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, CommerceError> {
        let url = format!(
            "{}/oauth/{}/customers/token",
            self.inner.auth_url, self.inner.project_key
        );

        let params = [
            ("grant_type", "password"),
            ("username", email),
            ("password", password),
        ];

        let response = self
            .inner
            .client
            .post(&url)
            .basic_auth(
                &self.inner.client_id,
                Some(self.inner.client_secret.expose_secret()),
            )
            .form(&params)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(rejection(response, ErrorResponse::into_oauth_description).await);
        }

        let token: TokenResponse = parse_body(response).await?;
        let refresh_token = token.refresh_token.ok_or_else(|| {
            CommerceError::UnexpectedResponse("token response without refresh_token".to_string())
        })?;

        debug!("Customer token issued");
        Ok(TokenPair::new(token.access_token, refresh_token))
    }

    /// Obtain a privileged token scoped to customer management.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Rejected`] if the client credentials are
    /// refused, or a transport/parse error.
    #[instrument(skip(self))]
    pub async fn obtain_service_token(&self) -> Result<ServiceToken, CommerceError> {
        let url = format!("{}/oauth/token", self.inner.auth_url);
        let scope = format!("manage_customers:{}", self.inner.project_key);

        let params = [
            ("grant_type", "client_credentials"),
            ("scope", scope.as_str()),
        ];

        let response = self
            .inner
            .client
            .post(&url)
            .basic_auth(
                &self.inner.client_id,
                Some(self.inner.client_secret.expose_secret()),
            )
            .form(&params)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(rejection(response, ErrorResponse::into_description).await);
        }

        let token: TokenResponse = parse_body(response).await?;

        Ok(ServiceToken {
            access_token: SecretString::from(token.access_token),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Customers
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a customer account.
    ///
    /// Obtains a fresh service token first; the customer is not logged in
    /// by this call.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Rejected`] if either the service token or the
    /// customer creation is refused (duplicate email, invalid draft), or a
    /// transport/parse error.
    #[instrument(skip(self, draft), fields(email = %draft.email))]
    pub async fn sign_up_customer(&self, draft: &SignupDraft) -> Result<Customer, CommerceError> {
        let service_token = self.obtain_service_token().await?;

        let url = format!("{}/{}/customers", self.inner.api_url, self.inner.project_key);

        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(service_token.access_token.expose_secret())
            .json(&draft.to_customer_draft())
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(rejection(response, ErrorResponse::into_description).await);
        }

        let created: SignUpResponse = parse_body(response).await?;

        debug!(customer_id = %created.customer.id, "Customer created");
        Ok(created.customer)
    }

    /// Fetch the profile of the customer owning `access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Rejected`] if the token is invalid or
    /// expired, or a transport/parse error.
    #[instrument(skip(self, access_token))]
    pub async fn fetch_me(&self, access_token: &str) -> Result<Customer, CommerceError> {
        let url = format!("{}/{}/me", self.inner.api_url, self.inner.project_key);

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(rejection(response, ErrorResponse::into_description).await);
        }

        parse_body(response).await
    }
}

/// Read a successful response body as JSON.
async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T, CommerceError> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Turn an unexpected status into [`CommerceError::Rejected`], keeping the
/// platform's description when `describe` finds one in the body.
async fn rejection(
    response: Response,
    describe: fn(ErrorResponse) -> Option<String>,
) -> CommerceError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let description = serde_json::from_str::<ErrorResponse>(&text)
        .ok()
        .and_then(describe);

    warn!(status, description = ?description, "Commerce API rejected request");
    CommerceError::Rejected {
        status,
        description,
    }
}
