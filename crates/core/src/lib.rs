//! Emporium Core - Shared types library.
//!
//! This crate provides the types and pure logic shared by the Emporium
//! components:
//! - `storefront` - Customer-facing login, signup and home pages
//! - `integration-tests` - End-to-end flows against a mocked commerce API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session access. This keeps it lightweight and lets the form
//! rules be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, tokens and addresses
//! - [`validation`] - Per-field validators used by the login and signup forms
//! - [`signup`] - The customer signup draft and its wire representation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod signup;
pub mod types;
pub mod validation;

pub use signup::{CustomerDraft, SignupDraft};
pub use types::*;
pub use validation::FieldError;
