//! Form input, validation dispatch and error collection.
//!
//! Field names here are the `name` attributes used by the templates and the
//! enhancement script, so a single [`Field`] identifies an input on both the
//! submit path and the per-keystroke `/validate/{field}` path.

pub mod countries;
pub mod login;
pub mod signup;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use emporium_core::FieldError;
use emporium_core::validation::{
    validate_city, validate_country, validate_date_of_birth, validate_email, validate_first_name,
    validate_last_name, validate_password, validate_post_code, validate_street,
};

pub use login::LoginForm;
pub use signup::{AddressEvent, AddressFields, AddressPart, SignupAddresses, SignupForm};

/// A validated form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    FirstName,
    LastName,
    Dob,
    Street,
    City,
    PostCode,
    Country,
    StreetShipping,
    CityShipping,
    PostCodeShipping,
    CountryShipping,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 13] = [
        Self::Email,
        Self::Password,
        Self::FirstName,
        Self::LastName,
        Self::Dob,
        Self::Street,
        Self::City,
        Self::PostCode,
        Self::Country,
        Self::StreetShipping,
        Self::CityShipping,
        Self::PostCodeShipping,
        Self::CountryShipping,
    ];

    /// The input's `name` attribute.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Dob => "dob",
            Self::Street => "street",
            Self::City => "city",
            Self::PostCode => "postCode",
            Self::Country => "country",
            Self::StreetShipping => "streetShipping",
            Self::CityShipping => "cityShipping",
            Self::PostCodeShipping => "postCodeShipping",
            Self::CountryShipping => "countryShipping",
        }
    }

    /// Look a field up by its `name` attribute.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Run the validator that belongs to `field`.
///
/// Billing and shipping inputs share rules.
///
/// # Errors
///
/// Returns the field's validation error.
pub fn validate_field(field: Field, value: &str, today: NaiveDate) -> Result<(), FieldError> {
    match field {
        Field::Email => validate_email(value),
        Field::Password => validate_password(value),
        Field::FirstName => validate_first_name(value),
        Field::LastName => validate_last_name(value),
        Field::Dob => validate_date_of_birth(Some(value), today).map(|_| ()),
        Field::Street | Field::StreetShipping => validate_street(value),
        Field::City | Field::CityShipping => validate_city(value),
        Field::PostCode | Field::PostCodeShipping => validate_post_code(value),
        Field::Country | Field::CountryShipping => validate_country(value),
    }
}

/// Per-field errors collected during one submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of validating `field`. Only failures are kept.
    pub fn check(&mut self, field: Field, result: Result<(), FieldError>) {
        if let Err(error) = result {
            self.errors.insert(field, error);
        }
    }

    /// Validate `value` as `field` and record any failure.
    pub fn validate(&mut self, field: Field, value: &str, today: NaiveDate) {
        self.check(field, validate_field(field, value, today));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Message for the input called `name`, or an empty string.
    ///
    /// Used by templates, which address inputs by name.
    #[must_use]
    pub fn message(&self, name: &str) -> String {
        Field::from_name(name)
            .and_then(|field| self.get(field))
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    /// `Ok(())` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Whether an HTML checkbox value means "checked".
///
/// Browsers omit unchecked boxes and send `on` (or the `value` attribute)
/// for checked ones.
pub(crate) fn is_checked(value: Option<&str>) -> bool {
    value.is_some_and(|v| !matches!(v, "" | "off" | "false"))
}
