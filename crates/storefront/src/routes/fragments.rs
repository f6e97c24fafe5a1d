//! HTML fragments for the enhancement script.
//!
//! Both endpoints return markup that replaces an element in place: a single
//! field's error message, or the whole shipping fieldset.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::Path, response::IntoResponse};
use chrono::Utc;
use emporium_core::validation::latest_local_date;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::forms::countries::{self, CountryOption};
use crate::forms::{Field, FieldErrors, SignupForm, validate_field};
use crate::middleware::RequireAnonymous;

/// Body of a per-keystroke validation request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValidateForm {
    pub value: String,
}

/// A field's error message; empty when the value is valid.
#[derive(Template, WebTemplate)]
#[template(path = "partials/field_error.html")]
pub struct FieldErrorTemplate {
    pub field: &'static str,
    pub message: String,
}

/// The shipping fieldset of the signup form.
#[derive(Template, WebTemplate)]
#[template(path = "partials/shipping_fields.html")]
pub struct ShippingFieldsTemplate {
    pub form: SignupForm,
    pub errors: FieldErrors,
    pub shipping_countries: Vec<CountryOption>,
}

/// Validate a single input.
///
/// # Errors
///
/// Returns `AppError::NotFound` for a field name no form uses.
pub async fn validate(
    Path(name): Path<String>,
    Form(input): Form<ValidateForm>,
) -> Result<impl IntoResponse> {
    let field = Field::from_name(&name).ok_or(AppError::NotFound(name))?;

    let message = validate_field(field, &input.value, latest_local_date(Utc::now()))
        .err()
        .map(|e| e.to_string())
        .unwrap_or_default();

    Ok(FieldErrorTemplate {
        field: field.name(),
        message,
    })
}

/// Re-render the shipping fieldset after an address edit.
///
/// The request carries the whole signup form and the name of the input that
/// changed in `changed`.
pub async fn shipping(_: RequireAnonymous, Form(mut form): Form<SignupForm>) -> impl IntoResponse {
    form.apply_change();
    form.password.clear();

    ShippingFieldsTemplate {
        shipping_countries: countries::options(&form.country_shipping),
        form,
        errors: FieldErrors::new(),
    }
}
