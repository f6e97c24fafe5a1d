//! Customer signup draft.
//!
//! [`SignupDraft`] is what the signup form produces once every field has
//! passed validation. It names the billing and shipping addresses
//! explicitly; the positional address list the commerce platform expects is
//! only derived when converting to [`CustomerDraft`] for transmission.

use core::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Address, BILLING_ADDRESS_INDEX, Email, SHIPPING_ADDRESS_INDEX};

/// A validated, not-yet-created customer.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupDraft {
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub billing_address: Address,
    pub shipping_address: Address,
    /// Mark the billing address as the customer's default billing address.
    pub default_billing: bool,
    /// Mark the shipping address as the customer's default shipping address.
    pub default_shipping: bool,
}

impl SignupDraft {
    /// Build the wire representation sent to the customer creation endpoint.
    ///
    /// Addresses are emitted billing first, shipping second; the default
    /// address fields and the billing/shipping index lists refer to those
    /// fixed positions.
    #[must_use]
    pub fn to_customer_draft(&self) -> CustomerDraft<'_> {
        CustomerDraft {
            email: self.email.as_str(),
            password: &self.password,
            first_name: &self.first_name,
            last_name: &self.last_name,
            date_of_birth: self.date_of_birth.format("%Y-%m-%d").to_string(),
            addresses: [&self.billing_address, &self.shipping_address],
            default_billing_address: self.default_billing.then_some(BILLING_ADDRESS_INDEX),
            default_shipping_address: self.default_shipping.then_some(SHIPPING_ADDRESS_INDEX),
            billing_addresses: if self.default_billing {
                vec![BILLING_ADDRESS_INDEX]
            } else {
                Vec::new()
            },
            shipping_addresses: if self.default_shipping {
                vec![SHIPPING_ADDRESS_INDEX]
            } else {
                Vec::new()
            },
        }
    }
}

impl fmt::Debug for SignupDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupDraft")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("date_of_birth", &self.date_of_birth)
            .field("billing_address", &self.billing_address)
            .field("shipping_address", &self.shipping_address)
            .field("default_billing", &self.default_billing)
            .field("default_shipping", &self.default_shipping)
            .finish()
    }
}

/// JSON body of the customer creation request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub date_of_birth: String,
    pub addresses: [&'a Address; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_billing_address: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_shipping_address: Option<u32>,
    pub billing_addresses: Vec<u32>,
    pub shipping_addresses: Vec<u32>,
}
