//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded in the span, echoed in the response)
//! 4. Security headers (CSP and friends)
//! 5. Session layer (tower-sessions, in-memory store)
//! 6. Rate limiting on auth submits and validation fragments (governor)
//!
//! Route guards are extractors ([`RequireAuth`], [`RequireAnonymous`]) rather
//! than layers, so each handler states its own access rule.

pub mod guard;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use guard::{GuardDecision, RequireAnonymous, RequireAuth, RouteAccess, decide};
pub use rate_limit::{RateLimiterLayer, auth_rate_limiter, fragment_rate_limiter};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, session_layer};
