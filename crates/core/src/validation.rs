//! Field validators for the login and signup forms.
//!
//! Every validator takes raw, untrusted input and returns `Ok` when the value
//! is acceptable or a [`FieldError`] whose `Display` is the message shown next
//! to the field. Validators never panic.
//!
//! Billing and shipping address fields share the same rules, so a single
//! validator serves both.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;

use crate::types::Email;

/// Minimum password length accepted at signup and login.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Offset of the furthest-ahead time zone (UTC+14, Line Islands).
const MAX_UTC_OFFSET_HOURS: i64 = 14;

/// Date formats accepted for the date of birth, tried in order.
const DATE_OF_BIRTH_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Letters (including Latin-1 Supplement and Latin Extended-A), whitespace,
/// apostrophes and hyphens.
static NAME_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\x{00C0}-\x{017F}\s'-]+$").expect("Invalid regex"));

static POST_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 ]{3,10}$").expect("Invalid regex"));

/// A single field's validation failure.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Email is required.")]
    EmailRequired,
    #[error("Invalid email format.")]
    EmailFormat,
    #[error("Password is required.")]
    PasswordRequired,
    #[error("Password must be at least 8 characters.")]
    PasswordTooShort,
    #[error("Password must contain an uppercase letter.")]
    PasswordMissingUppercase,
    #[error("Password must contain a lowercase letter.")]
    PasswordMissingLowercase,
    #[error("Password must contain a digit.")]
    PasswordMissingDigit,
    /// Generic "this field is empty" used by names, streets and post codes.
    #[error("Required.")]
    Required,
    /// Generic format failure used by names and post codes.
    #[error("Invalid format.")]
    InvalidFormat,
    #[error("City is required.")]
    CityRequired,
    #[error("Only letters, spaces, apostrophes or hyphens.")]
    CityCharset,
    #[error("Country is required.")]
    CountryRequired,
    #[error("Date of birth is required.")]
    DateOfBirthRequired,
    #[error("Invalid date format.")]
    DateOfBirthInvalid,
    #[error("Date of birth cannot be in the future.")]
    DateOfBirthInFuture,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate an email address (`local@domain.tld`).
///
/// # Errors
///
/// Returns [`FieldError::EmailRequired`] for blank input and
/// [`FieldError::EmailFormat`] when the shape is wrong.
pub fn validate_email(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::EmailRequired);
    }
    Email::parse(value).map(|_| ()).map_err(|_| FieldError::EmailFormat)
}

/// Validate a password: at least eight characters with an upper-case letter,
/// a lower-case letter and a digit.
///
/// Checks run in that order, so the first unmet rule is the one reported.
///
/// # Errors
///
/// Returns the first rule the password fails.
pub fn validate_password(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::PasswordRequired);
    }
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FieldError::PasswordTooShort);
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(FieldError::PasswordMissingUppercase);
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(FieldError::PasswordMissingLowercase);
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(FieldError::PasswordMissingDigit);
    }
    Ok(())
}

fn validate_person_name(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::Required);
    }
    let starts_upper = value.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    if !NAME_CHARSET_RE.is_match(value) || !starts_upper {
        return Err(FieldError::InvalidFormat);
    }
    Ok(())
}

/// Validate a first name: letters, spaces, apostrophes or hyphens, starting
/// with an upper-case letter.
///
/// # Errors
///
/// Returns [`FieldError::Required`] or [`FieldError::InvalidFormat`].
pub fn validate_first_name(value: &str) -> Result<(), FieldError> {
    validate_person_name(value)
}

/// Validate a last name. Same rules as [`validate_first_name`].
///
/// # Errors
///
/// Returns [`FieldError::Required`] or [`FieldError::InvalidFormat`].
pub fn validate_last_name(value: &str) -> Result<(), FieldError> {
    validate_person_name(value)
}

/// Validate a street (billing or shipping). Only presence is checked.
///
/// # Errors
///
/// Returns [`FieldError::Required`] for blank input.
pub fn validate_street(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::Required);
    }
    Ok(())
}

/// Validate a city name (billing or shipping).
///
/// # Errors
///
/// Returns [`FieldError::CityRequired`] or [`FieldError::CityCharset`].
pub fn validate_city(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::CityRequired);
    }
    if !NAME_CHARSET_RE.is_match(value) {
        return Err(FieldError::CityCharset);
    }
    Ok(())
}

/// Validate a post code (billing or shipping): 3 to 10 letters, digits or
/// spaces.
///
/// # Errors
///
/// Returns [`FieldError::Required`] or [`FieldError::InvalidFormat`].
pub fn validate_post_code(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::Required);
    }
    if !POST_CODE_RE.is_match(value) {
        return Err(FieldError::InvalidFormat);
    }
    Ok(())
}

/// Validate a country selection (billing or shipping).
///
/// # Errors
///
/// Returns [`FieldError::CountryRequired`] for blank input.
pub fn validate_country(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::CountryRequired);
    }
    Ok(())
}

/// The latest calendar date any customer can be living in at `now`.
///
/// The server does not know the customer's time zone, so date-of-birth
/// checks compare against this date: "today" in the customer's zone is
/// never later than it.
#[must_use]
pub fn latest_local_date(now: DateTime<Utc>) -> NaiveDate {
    (now + Duration::hours(MAX_UTC_OFFSET_HOURS)).date_naive()
}

/// Validate and parse a date of birth.
///
/// Accepts `YYYY-MM-DD` (HTML date inputs) and `MM/DD/YYYY`. The date must
/// be a real calendar date no later than `today`.
///
/// # Errors
///
/// Returns [`FieldError::DateOfBirthRequired`] when absent or blank,
/// [`FieldError::DateOfBirthInvalid`] when unparseable, and
/// [`FieldError::DateOfBirthInFuture`] when after `today`.
pub fn validate_date_of_birth(
    value: Option<&str>,
    today: NaiveDate,
) -> Result<NaiveDate, FieldError> {
    let raw = match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(FieldError::DateOfBirthRequired),
    };

    let date = DATE_OF_BIRTH_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or(FieldError::DateOfBirthInvalid)?;

    if date > today {
        return Err(FieldError::DateOfBirthInFuture);
    }
    Ok(date)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_latest_local_date_runs_ahead_of_utc() {
        let late_evening = DateTime::parse_from_rfc3339("2025-06-15T22:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let tomorrow = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        assert_eq!(latest_local_date(late_evening), tomorrow);

        // Already the 16th in Kiribati: a birth that day is not in the future
        assert_eq!(
            validate_date_of_birth(Some("2025-06-16"), latest_local_date(late_evening)),
            Ok(tomorrow)
        );

        let morning = DateTime::parse_from_rfc3339("2025-06-15T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(latest_local_date(morning), today());
    }

    #[test]
    fn test_email_valid_shapes() {
        for input in ["x@y.z", "jane.doe@example.com", "a+b@mail.example.org"] {
            assert_eq!(validate_email(input), Ok(()), "{input}");
        }
    }

    #[test]
    fn test_email_required() {
        assert_eq!(validate_email(""), Err(FieldError::EmailRequired));
        assert_eq!(validate_email("   "), Err(FieldError::EmailRequired));
    }

    #[test]
    fn test_email_missing_at_or_dot() {
        for input in ["plainaddress", "user@domain", "user@domain.", "@x.y"] {
            let err = validate_email(input).unwrap_err();
            assert_eq!(err, FieldError::EmailFormat, "{input}");
            assert_eq!(err.to_string(), "Invalid email format.");
        }
    }

    #[test]
    fn test_password_valid() {
        assert_eq!(validate_password("Abcdefg1"), Ok(()));
    }

    #[test]
    fn test_password_missing_uppercase() {
        let err = validate_password("abcdefg1").unwrap_err();
        assert_eq!(err, FieldError::PasswordMissingUppercase);
        assert_eq!(err.to_string(), "Password must contain an uppercase letter.");
    }

    #[test]
    fn test_password_too_short() {
        let err = validate_password("short1A").unwrap_err();
        assert_eq!(err, FieldError::PasswordTooShort);
        assert_eq!(err.to_string(), "Password must be at least 8 characters.");
    }

    #[test]
    fn test_password_rule_order() {
        assert_eq!(validate_password(""), Err(FieldError::PasswordRequired));
        assert_eq!(
            validate_password("ABCDEFG1"),
            Err(FieldError::PasswordMissingLowercase)
        );
        assert_eq!(
            validate_password("Abcdefgh"),
            Err(FieldError::PasswordMissingDigit)
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(validate_first_name("Anna-Marie"), Ok(()));
        assert_eq!(validate_last_name("O'Brien"), Ok(()));
        assert_eq!(validate_last_name("Müller"), Ok(()));
        assert_eq!(validate_first_name(""), Err(FieldError::Required));
        assert_eq!(validate_first_name("anna"), Err(FieldError::InvalidFormat));
        assert_eq!(validate_last_name("Smith2"), Err(FieldError::InvalidFormat));
        assert_eq!(validate_last_name("Élodie"), Err(FieldError::InvalidFormat));
    }

    #[test]
    fn test_city() {
        assert_eq!(validate_city("Saint-Étienne"), Ok(()));
        assert_eq!(validate_city("new york"), Ok(()));
        assert_eq!(validate_city(" "), Err(FieldError::CityRequired));
        let err = validate_city("Berlin 10").unwrap_err();
        assert_eq!(err.to_string(), "Only letters, spaces, apostrophes or hyphens.");
    }

    #[test]
    fn test_street() {
        assert_eq!(validate_street("Main St 1"), Ok(()));
        assert_eq!(validate_street("\t"), Err(FieldError::Required));
    }

    #[test]
    fn test_post_code() {
        assert_eq!(validate_post_code("10115"), Ok(()));
        assert_eq!(validate_post_code("SW1A 1AA"), Ok(()));
        assert_eq!(validate_post_code(""), Err(FieldError::Required));
        assert_eq!(validate_post_code("12"), Err(FieldError::InvalidFormat));
        assert_eq!(validate_post_code("12345678901"), Err(FieldError::InvalidFormat));
        assert_eq!(validate_post_code("123-45"), Err(FieldError::InvalidFormat));
    }

    #[test]
    fn test_country() {
        assert_eq!(validate_country("de"), Ok(()));
        assert_eq!(validate_country(""), Err(FieldError::CountryRequired));
    }

    #[test]
    fn test_date_of_birth() {
        let expected = NaiveDate::from_ymd_opt(1990, 4, 1).unwrap();
        assert_eq!(validate_date_of_birth(Some("1990-04-01"), today()), Ok(expected));
        assert_eq!(validate_date_of_birth(Some("04/01/1990"), today()), Ok(expected));
        assert_eq!(validate_date_of_birth(Some("2025-06-15"), today()).unwrap(), today());
    }

    #[test]
    fn test_date_of_birth_errors() {
        assert_eq!(
            validate_date_of_birth(None, today()),
            Err(FieldError::DateOfBirthRequired)
        );
        assert_eq!(
            validate_date_of_birth(Some(""), today()),
            Err(FieldError::DateOfBirthRequired)
        );
        assert_eq!(
            validate_date_of_birth(Some("1990-02-30"), today()),
            Err(FieldError::DateOfBirthInvalid)
        );
        assert_eq!(
            validate_date_of_birth(Some("yesterday"), today()),
            Err(FieldError::DateOfBirthInvalid)
        );
        assert_eq!(
            validate_date_of_birth(Some("2025-06-16"), today()),
            Err(FieldError::DateOfBirthInFuture)
        );
    }
}
