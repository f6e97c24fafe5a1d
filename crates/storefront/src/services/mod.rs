//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Customer login, signup and logout flows
//! - `profile` - Cached customer profiles keyed by access token
//! - `submit` - In-flight tracking for login and signup submits

pub mod auth;
pub mod profile;
pub mod submit;
