//! Signup form and billing/shipping address synchronization.

use core::fmt;

use chrono::NaiveDate;
use emporium_core::validation::validate_date_of_birth;
use emporium_core::{Address, Email, FieldError, SignupDraft};
use serde::Deserialize;

use super::{Field, FieldErrors, is_checked};

// =============================================================================
// Address Sync
// =============================================================================

/// One input of an address fieldset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressPart {
    Street,
    City,
    PostCode,
    Country,
}

impl AddressPart {
    pub const ALL: [Self; 4] = [Self::Street, Self::City, Self::PostCode, Self::Country];

    /// The billing input carrying this part.
    #[must_use]
    pub const fn billing_field(self) -> Field {
        match self {
            Self::Street => Field::Street,
            Self::City => Field::City,
            Self::PostCode => Field::PostCode,
            Self::Country => Field::Country,
        }
    }

    /// The shipping input carrying this part.
    #[must_use]
    pub const fn shipping_field(self) -> Field {
        match self {
            Self::Street => Field::StreetShipping,
            Self::City => Field::CityShipping,
            Self::PostCode => Field::PostCodeShipping,
            Self::Country => Field::CountryShipping,
        }
    }
}

/// Raw values of one address fieldset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub street: String,
    pub city: String,
    pub post_code: String,
    pub country: String,
}

impl AddressFields {
    #[must_use]
    pub fn get(&self, part: AddressPart) -> &str {
        match part {
            AddressPart::Street => &self.street,
            AddressPart::City => &self.city,
            AddressPart::PostCode => &self.post_code,
            AddressPart::Country => &self.country,
        }
    }

    pub fn set(&mut self, part: AddressPart, value: String) {
        match part {
            AddressPart::Street => self.street = value,
            AddressPart::City => self.city = value,
            AddressPart::PostCode => self.post_code = value,
            AddressPart::Country => self.country = value,
        }
    }

    fn to_address(&self) -> Address {
        Address::new(&self.street, &self.post_code, &self.city, &self.country)
    }
}

/// Something the customer did to the address fieldsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressEvent {
    /// The "same as billing" box was checked or unchecked.
    SameAsBilling(bool),
    BillingEdited(AddressPart, String),
    ShippingEdited(AddressPart, String),
}

/// Billing and shipping addresses with one-way billing-to-shipping sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupAddresses {
    pub billing: AddressFields,
    pub shipping: AddressFields,
    pub same_as_billing: bool,
}

impl SignupAddresses {
    pub fn apply(&mut self, event: AddressEvent) {
        match event {
            AddressEvent::SameAsBilling(true) => {
                self.same_as_billing = true;
                self.shipping = self.billing.clone();
            }
            AddressEvent::SameAsBilling(false) => {
                self.same_as_billing = false;
            }
            AddressEvent::BillingEdited(part, value) => {
                if self.same_as_billing {
                    self.shipping.set(part, value.clone());
                }
                self.billing.set(part, value);
            }
            AddressEvent::ShippingEdited(part, value) => {
                // A manual shipping edit breaks the link
                self.same_as_billing = false;
                self.shipping.set(part, value);
            }
        }
    }
}

// =============================================================================
// Signup Form
// =============================================================================

/// Submitted signup form.
///
/// Field names follow the inputs: `postCode`, `streetShipping`, and so on.
/// Checkboxes are `None` when unchecked.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub street: String,
    pub city: String,
    pub post_code: String,
    pub country: String,
    pub street_shipping: String,
    pub city_shipping: String,
    pub post_code_shipping: String,
    pub country_shipping: String,
    pub same_as_billing: Option<String>,
    pub default_billing: Option<String>,
    pub default_shipping: Option<String>,
    /// Name of the input that triggered a `/signup/shipping` refresh.
    pub changed: Option<String>,
}

impl SignupForm {
    #[must_use]
    pub fn same_as_billing(&self) -> bool {
        is_checked(self.same_as_billing.as_deref())
    }

    #[must_use]
    pub fn default_billing(&self) -> bool {
        is_checked(self.default_billing.as_deref())
    }

    #[must_use]
    pub fn default_shipping(&self) -> bool {
        is_checked(self.default_shipping.as_deref())
    }

    /// The address fieldsets as submitted.
    #[must_use]
    pub fn addresses(&self) -> SignupAddresses {
        SignupAddresses {
            billing: AddressFields {
                street: self.street.clone(),
                city: self.city.clone(),
                post_code: self.post_code.clone(),
                country: self.country.clone(),
            },
            shipping: AddressFields {
                street: self.street_shipping.clone(),
                city: self.city_shipping.clone(),
                post_code: self.post_code_shipping.clone(),
                country: self.country_shipping.clone(),
            },
            same_as_billing: self.same_as_billing(),
        }
    }

    /// Write `addresses` back into the form fields.
    pub fn set_addresses(&mut self, addresses: SignupAddresses) {
        let SignupAddresses {
            billing,
            shipping,
            same_as_billing,
        } = addresses;

        self.street = billing.street;
        self.city = billing.city;
        self.post_code = billing.post_code;
        self.country = billing.country;
        self.street_shipping = shipping.street;
        self.city_shipping = shipping.city;
        self.post_code_shipping = shipping.post_code;
        self.country_shipping = shipping.country;
        self.same_as_billing = same_as_billing.then(|| "on".to_string());
    }

    /// Apply the event named by `changed` to the address fieldsets.
    ///
    /// The browser sends the whole form after each edit, so the new value of
    /// the edited input is already in place; the event only decides what else
    /// follows from it. Unknown or missing names change nothing.
    pub fn apply_change(&mut self) {
        let Some(event) = self.changed.as_deref().and_then(|name| self.event_for(name)) else {
            return;
        };

        let mut addresses = self.addresses();
        addresses.apply(event);
        self.set_addresses(addresses);
    }

    fn event_for(&self, name: &str) -> Option<AddressEvent> {
        if name == "sameAsBilling" {
            return Some(AddressEvent::SameAsBilling(self.same_as_billing()));
        }

        let field = Field::from_name(name)?;
        let addresses = self.addresses();
        AddressPart::ALL.into_iter().find_map(|part| {
            if part.billing_field() == field {
                Some(AddressEvent::BillingEdited(
                    part,
                    addresses.billing.get(part).to_string(),
                ))
            } else if part.shipping_field() == field {
                Some(AddressEvent::ShippingEdited(
                    part,
                    addresses.shipping.get(part).to_string(),
                ))
            } else {
                None
            }
        })
    }

    /// Copy billing into shipping when "same as billing" is checked.
    pub fn sync_shipping(&mut self) {
        if self.same_as_billing() {
            let mut addresses = self.addresses();
            addresses.apply(AddressEvent::SameAsBilling(true));
            self.set_addresses(addresses);
        }
    }

    /// Validate every field and build the draft.
    ///
    /// Shipping equals billing when "same as billing" is checked, whatever
    /// the shipping inputs hold.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn to_draft(&self, today: NaiveDate) -> Result<SignupDraft, FieldErrors> {
        let mut form = self.clone();
        form.sync_shipping();

        let mut errors = FieldErrors::new();
        errors.validate(Field::Email, &form.email, today);
        errors.validate(Field::Password, &form.password, today);
        errors.validate(Field::FirstName, &form.first_name, today);
        errors.validate(Field::LastName, &form.last_name, today);
        let date_of_birth = validate_date_of_birth(Some(form.dob.as_str()), today);
        errors.check(Field::Dob, date_of_birth.map(|_| ()));

        let addresses = form.addresses();
        for part in AddressPart::ALL {
            errors.validate(part.billing_field(), addresses.billing.get(part), today);
            errors.validate(part.shipping_field(), addresses.shipping.get(part), today);
        }

        errors.into_result()?;

        let email = Email::parse(&form.email).map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.check(Field::Email, Err(FieldError::EmailFormat));
            errors
        })?;
        let date_of_birth = date_of_birth.map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.check(Field::Dob, Err(e));
            errors
        })?;

        Ok(SignupDraft {
            email,
            password: form.password.clone(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            date_of_birth,
            billing_address: addresses.billing.to_address(),
            shipping_address: addresses.shipping.to_address(),
            default_billing: form.default_billing(),
            default_shipping: form.default_shipping(),
        })
    }
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("dob", &self.dob)
            .field("addresses", &self.addresses())
            .field("default_billing", &self.default_billing())
            .field("default_shipping", &self.default_shipping())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn berlin() -> AddressFields {
        AddressFields {
            street: "Main St".to_string(),
            city: "Berlin".to_string(),
            post_code: "10115".to_string(),
            country: "de".to_string(),
        }
    }

    fn valid_form() -> SignupForm {
        SignupForm {
            email: "jane@example.com".to_string(),
            password: "Abcdefg1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            dob: "1990-04-01".to_string(),
            street: "Main St".to_string(),
            city: "Berlin".to_string(),
            post_code: "10115".to_string(),
            country: "de".to_string(),
            street_shipping: "Rue de Rivoli".to_string(),
            city_shipping: "Paris".to_string(),
            post_code_shipping: "75001".to_string(),
            country_shipping: "fr".to_string(),
            ..SignupForm::default()
        }
    }

    #[test]
    fn test_same_as_billing_keeps_shipping_in_step() {
        let mut addresses = SignupAddresses {
            billing: berlin(),
            ..SignupAddresses::default()
        };

        addresses.apply(AddressEvent::SameAsBilling(true));
        assert_eq!(addresses.shipping, addresses.billing);

        addresses.apply(AddressEvent::BillingEdited(
            AddressPart::City,
            "Hamburg".to_string(),
        ));
        addresses.apply(AddressEvent::BillingEdited(
            AddressPart::Country,
            "at".to_string(),
        ));
        assert_eq!(addresses.shipping, addresses.billing);
        assert_eq!(addresses.shipping.country, "at");
    }

    #[test]
    fn test_manual_shipping_edit_stops_sync() {
        let mut addresses = SignupAddresses {
            billing: berlin(),
            ..SignupAddresses::default()
        };
        addresses.apply(AddressEvent::SameAsBilling(true));

        addresses.apply(AddressEvent::ShippingEdited(
            AddressPart::Street,
            "Side St".to_string(),
        ));
        assert!(!addresses.same_as_billing);

        addresses.apply(AddressEvent::SameAsBilling(false));
        addresses.apply(AddressEvent::BillingEdited(
            AddressPart::City,
            "Munich".to_string(),
        ));

        assert_eq!(addresses.shipping.city, "Berlin");
        assert_eq!(addresses.shipping.street, "Side St");
    }

    #[test]
    fn test_unchecking_leaves_shipping_unchanged() {
        let mut addresses = SignupAddresses {
            billing: berlin(),
            ..SignupAddresses::default()
        };
        addresses.apply(AddressEvent::SameAsBilling(true));
        addresses.apply(AddressEvent::SameAsBilling(false));

        assert_eq!(addresses.shipping, berlin());
    }

    #[test]
    fn test_apply_change_from_billing_edit() {
        let mut form = valid_form();
        form.same_as_billing = Some("on".to_string());
        form.city = "Hamburg".to_string();
        form.changed = Some("city".to_string());

        form.apply_change();

        assert_eq!(form.city_shipping, "Hamburg");
        assert!(form.same_as_billing());
    }

    #[test]
    fn test_apply_change_from_toggle() {
        let mut form = valid_form();
        form.same_as_billing = Some("on".to_string());
        form.changed = Some("sameAsBilling".to_string());

        form.apply_change();

        assert_eq!(form.street_shipping, "Main St");
        assert_eq!(form.country_shipping, "de");
    }

    #[test]
    fn test_apply_change_from_shipping_edit_unchecks() {
        let mut form = valid_form();
        form.same_as_billing = Some("on".to_string());
        form.changed = Some("streetShipping".to_string());

        form.apply_change();

        assert!(!form.same_as_billing());
        assert_eq!(form.street_shipping, "Rue de Rivoli");
    }

    #[test]
    fn test_to_draft_uppercases_countries() {
        let draft = valid_form().to_draft(today()).unwrap();

        assert_eq!(draft.billing_address.country, "DE");
        assert_eq!(draft.shipping_address.country, "FR");
        assert_eq!(draft.date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 1).unwrap());
        assert!(!draft.default_billing);
        assert!(!draft.default_shipping);
    }

    #[test]
    fn test_to_draft_same_as_billing_overrides_shipping_inputs() {
        let mut form = valid_form();
        form.same_as_billing = Some("on".to_string());
        form.street_shipping = String::new();
        form.city_shipping = "N0t a c1ty".to_string();

        let draft = form.to_draft(today()).unwrap();

        assert_eq!(draft.shipping_address, draft.billing_address);
    }

    #[test]
    fn test_to_draft_default_flags_are_independent() {
        let mut form = valid_form();
        form.default_shipping = Some("on".to_string());

        let draft = form.to_draft(today()).unwrap();

        assert!(!draft.default_billing);
        assert!(draft.default_shipping);
    }

    #[test]
    fn test_to_draft_collects_every_error() {
        let form = SignupForm {
            email: "jane".to_string(),
            city_shipping: "Par1s".to_string(),
            dob: "2030-01-01".to_string(),
            ..SignupForm::default()
        };

        let errors = form.to_draft(today()).unwrap_err();

        assert_eq!(errors.message("email"), "Invalid email format.");
        assert_eq!(errors.message("password"), "Password is required.");
        assert_eq!(errors.message("firstName"), "Required.");
        assert_eq!(errors.message("dob"), "Date of birth cannot be in the future.");
        assert_eq!(errors.message("city"), "City is required.");
        assert_eq!(
            errors.message("cityShipping"),
            "Only letters, spaces, apostrophes or hyphens."
        );
        assert_eq!(errors.message("countryShipping"), "Country is required.");
        assert_eq!(errors.len(), 13);
    }
}
