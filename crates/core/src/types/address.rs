//! Postal address type.

use serde::{Deserialize, Serialize};

/// Position of the billing address in a serialized customer draft.
pub const BILLING_ADDRESS_INDEX: u32 = 0;

/// Position of the shipping address in a serialized customer draft.
pub const SHIPPING_ADDRESS_INDEX: u32 = 1;

/// A postal address as sent to the commerce platform.
///
/// Country codes are ISO 3166-1 alpha-2 and always stored upper-case; the
/// signup form submits them lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street name and number.
    pub street_name: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// City name.
    pub city: String,
    /// Upper-case country code (e.g. `DE`).
    pub country: String,
}

impl Address {
    /// Create an address, upper-casing the country code.
    #[must_use]
    pub fn new(street_name: &str, postal_code: &str, city: &str, country: &str) -> Self {
        Self {
            street_name: street_name.to_owned(),
            postal_code: postal_code.to_owned(),
            city: city.to_owned(),
            country: country.trim().to_uppercase(),
        }
    }
}
