//! Customer token storage.
//!
//! Handlers never touch session keys directly; they go through a
//! [`TokenStore`], so the flow logic in [`crate::services::auth`] can run
//! against [`MemoryTokenStore`] in tests.

use std::future::Future;
use std::sync::Arc;

use emporium_core::TokenPair;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_sessions::Session;

/// Session keys for authentication data.
pub mod keys {
    /// Key for the customer access token.
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Key for the customer refresh token.
    pub const REFRESH_TOKEN: &str = "refreshToken";
}

/// Token store failure.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Where the current customer's token pair lives between requests.
pub trait TokenStore: Send + Sync {
    /// The stored pair, if both halves are present.
    fn get(&self) -> impl Future<Output = Result<Option<TokenPair>, SessionStoreError>> + Send;

    /// Store both tokens, replacing any previous pair.
    fn set(&self, tokens: &TokenPair)
    -> impl Future<Output = Result<(), SessionStoreError>> + Send;

    /// Remove both tokens.
    fn clear(&self) -> impl Future<Output = Result<(), SessionStoreError>> + Send;
}

// ─────────────────────────────────────────────────────────────────────────────
// Session-backed store
// ─────────────────────────────────────────────────────────────────────────────

/// [`TokenStore`] over the request's tower-sessions [`Session`].
#[derive(Clone)]
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Drop the whole session record and expire the cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot delete the record.
    pub async fn flush(&self) -> Result<(), SessionStoreError> {
        self.session.flush().await?;
        Ok(())
    }
}

impl TokenStore for SessionTokenStore {
    async fn get(&self) -> Result<Option<TokenPair>, SessionStoreError> {
        let access = self.session.get::<String>(keys::ACCESS_TOKEN).await?;
        let refresh = self.session.get::<String>(keys::REFRESH_TOKEN).await?;

        Ok(match (access, refresh) {
            (Some(access), Some(refresh)) => Some(TokenPair::new(access, refresh)),
            _ => None,
        })
    }

    async fn set(&self, tokens: &TokenPair) -> Result<(), SessionStoreError> {
        // New session ID on privilege change
        self.session.cycle_id().await?;
        self.session
            .insert(keys::ACCESS_TOKEN, &tokens.access_token)
            .await?;
        self.session
            .insert(keys::REFRESH_TOKEN, &tokens.refresh_token)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        self.session.remove::<String>(keys::ACCESS_TOKEN).await?;
        self.session.remove::<String>(keys::REFRESH_TOKEN).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local [`TokenStore`] holding a single pair.
///
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<Option<TokenPair>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `tokens`.
    #[must_use]
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Some(tokens))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<TokenPair>, SessionStoreError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn set(&self, tokens: &TokenPair) -> Result<(), SessionStoreError> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        *self.tokens.write().await = None;
        Ok(())
    }
}
