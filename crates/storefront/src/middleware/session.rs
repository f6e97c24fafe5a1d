//! Session middleware configuration.
//!
//! Sessions live in process memory; tokens are the only thing stored, and
//! losing them on restart only means logging in again.
//!
//! `MemoryStore` never evicts: a session that expires without a logout
//! keeps its record until the process restarts. Expired records are never
//! loaded again, so they cost memory only. Each record holds one token
//! pair, which keeps that growth small for a single storefront instance.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "emporium_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    session_layer(MemoryStore::default(), config.is_secure())
}

/// Session layer over `store`; `secure` marks the cookie HTTPS-only.
#[must_use]
pub fn session_layer(store: MemoryStore, secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
