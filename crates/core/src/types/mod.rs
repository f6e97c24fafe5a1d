//! Core types for Emporium.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod token;

pub use address::{Address, BILLING_ADDRESS_INDEX, SHIPPING_ADDRESS_INDEX};
pub use email::{Email, EmailError};
pub use token::TokenPair;
