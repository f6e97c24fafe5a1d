//! Cached customer profiles.
//!
//! Profiles are keyed by access token, so a new login never sees the
//! previous customer's entry.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use crate::commerce::{CommerceClient, CommerceError, Customer};

const PROFILE_TTL: Duration = Duration::from_secs(30 * 60);
const MAX_PROFILES: u64 = 10_000;

/// In-memory profile cache in front of [`CommerceClient::fetch_me`].
#[derive(Clone)]
pub struct ProfileCache {
    cache: Cache<String, Customer>,
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileCache {
    /// Create an empty cache with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(PROFILE_TTL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_PROFILES)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Cached profile for `access_token`, if any.
    pub async fn get(&self, access_token: &str) -> Option<Customer> {
        self.cache.get(access_token).await
    }

    /// Return the cached profile, fetching and caching it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the fetch error on a miss; nothing is cached in that case.
    #[instrument(skip_all)]
    pub async fn get_or_fetch(
        &self,
        client: &CommerceClient,
        access_token: &str,
    ) -> Result<Customer, CommerceError> {
        if let Some(customer) = self.cache.get(access_token).await {
            debug!("Cache hit for profile");
            return Ok(customer);
        }

        let customer = client.fetch_me(access_token).await?;
        self.insert(access_token, customer.clone()).await;

        Ok(customer)
    }

    pub async fn insert(&self, access_token: &str, customer: Customer) {
        self.cache.insert(access_token.to_string(), customer).await;
    }

    pub async fn invalidate(&self, access_token: &str) {
        self.cache.invalidate(access_token).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::CommerceConfig;

    fn client_for(server: &MockServer) -> CommerceClient {
        CommerceClient::new(&CommerceConfig {
            project_key: "emporium-test".to_string(),
            auth_url: server.uri(),
            api_url: server.uri(),
            client_id: "storefront".to_string(),
            client_secret: SecretString::from("s3cr3t"),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            email: "jane@example.com".to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_get_or_fetch_hits_upstream_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/emporium-test/me"))
            .and(header("authorization", "Bearer at-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c-1",
                "email": "jane@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let profiles = ProfileCache::new();

        let first = profiles.get_or_fetch(&client, "at-1").await.unwrap();
        let second = profiles.get_or_fetch(&client, "at-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.id, "c-1");
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/emporium-test/me"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let profiles = ProfileCache::new();

        assert!(profiles.get_or_fetch(&client, "expired").await.is_err());
        assert!(profiles.get_or_fetch(&client, "expired").await.is_err());
        assert!(profiles.get("expired").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let profiles = ProfileCache::new();
        profiles.insert("at-1", customer("c-1")).await;
        profiles.insert("at-2", customer("c-2")).await;

        profiles.invalidate("at-1").await;

        assert!(profiles.get("at-1").await.is_none());
        assert_eq!(profiles.get("at-2").await.unwrap().id, "c-2");
    }
}
