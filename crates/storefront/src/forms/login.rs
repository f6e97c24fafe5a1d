//! Login form.

use core::fmt;

use chrono::NaiveDate;
use emporium_core::{Email, FieldError};
use serde::Deserialize;

use super::{Field, FieldErrors};

/// Submitted login credentials.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Validate both fields with the signup rules and parse the email.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self, today: NaiveDate) -> Result<Email, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.validate(Field::Email, &self.email, today);
        errors.validate(Field::Password, &self.password, today);
        errors.into_result()?;

        Email::parse(&self.email).map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.check(Field::Email, Err(FieldError::EmailFormat));
            errors
        })
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_credentials() {
        let email = form("jane@example.com", "Abcdefg1").validate(today()).unwrap();
        assert_eq!(email.as_str(), "jane@example.com");
    }

    #[test]
    fn test_reports_both_fields() {
        let errors = form("", "short1A").validate(today()).unwrap_err();

        assert_eq!(errors.message("email"), "Email is required.");
        assert_eq!(
            errors.message("password"),
            "Password must be at least 8 characters."
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let output = format!("{:?}", form("jane@example.com", "Abcdefg1"));
        assert!(!output.contains("Abcdefg1"));
    }
}
