//! Integration tests for Emporium.
//!
//! Each test starts the storefront in-process on an ephemeral port, backed by
//! a `wiremock` server standing in for the commerce platform, and drives it
//! with a cookie-carrying `reqwest` client the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emporium-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use emporium_storefront::config::{CommerceConfig, StorefrontConfig};
use emporium_storefront::routes;
use emporium_storefront::state::AppState;
use reqwest::{Client, Response, redirect};
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Project key the mock platform serves.
pub const PROJECT_KEY: &str = "emporium-test";

/// Access token the mock platform issues to customers.
pub const ACCESS_TOKEN: &str = "customer-access-token";

/// A running storefront plus its mock commerce platform.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    pub upstream: MockServer,
}

impl TestContext {
    /// Start a mock platform and a storefront pointed at it.
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        let state = AppState::new(config(&upstream.uri())).unwrap();
        let app = emporium_storefront::app(state, routes::routes());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url: format!("http://{addr}"),
            upstream,
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.storefront_url))
            .send()
            .await
            .unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.storefront_url))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Mock a successful customer password grant and profile lookup.
    pub async fn mock_login_success(&self, email: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/oauth/{PROJECT_KEY}/customers/token")))
            .respond_with(ResponseTemplate::new(200).set_body_json(customer_token()))
            .mount(&self.upstream)
            .await;

        self.mock_profile(email).await;
    }

    /// Mock the profile lookup for [`ACCESS_TOKEN`].
    pub async fn mock_profile(&self, email: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{PROJECT_KEY}/me")))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "customer-1",
                "email": email,
                "firstName": "Jane",
            })))
            .mount(&self.upstream)
            .await;
    }

    /// Mock the service token grant used to authorize signup.
    pub async fn mock_service_token(&self) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "service-token",
                "expires_in": 172_800,
                "scope": format!("manage_customers:{PROJECT_KEY}"),
                "token_type": "Bearer",
            })))
            .mount(&self.upstream)
            .await;
    }
}

/// Body of a successful customer password grant.
#[must_use]
pub fn customer_token() -> Value {
    json!({
        "access_token": ACCESS_TOKEN,
        "refresh_token": "customer-refresh-token",
        "expires_in": 172_800,
        "scope": format!("manage_project:{PROJECT_KEY}"),
        "token_type": "Bearer",
    })
}

/// Storefront configuration pointing both commerce hosts at `upstream`.
#[must_use]
pub fn config(upstream: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost".to_string(),
        commerce: CommerceConfig {
            project_key: PROJECT_KEY.to_string(),
            auth_url: upstream.to_string(),
            api_url: upstream.to_string(),
            client_id: "storefront".to_string(),
            client_secret: SecretString::from("s3cr3t"),
            timeout: Duration::from_secs(5),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
