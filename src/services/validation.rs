//! Form validation for signup, verification and login.
//!
//! Lengths are counted in characters. A blank field reports only
//! "This field is required." and none of its other failures.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

const REQUIRED_CODE: &str = "required";
const REQUIRED_MESSAGE: &str = "This field is required.";

/// Dot-atom local part: no leading, trailing or doubled dots, no quoting.
static DOT_ATOM_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[^@\s]+$")
        .expect("email regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError { field: field.into(), message: message.into() }
    }
}

pub fn errors_for<'a>(errors: &'a [FieldError], field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    errors
        .iter()
        .filter(move |e| e.field == field)
        .map(|e| e.message.as_str())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(REQUIRED_CODE).with_message(Cow::Borrowed(REQUIRED_MESSAGE)));
    }
    Ok(())
}

fn email_address(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if DOT_ATOM_EMAIL.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(Cow::Borrowed("Invalid email address.")))
}

/// Signup form as posted by the browser. Missing fields deserialize to empty
/// strings so they are reported as required.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupData {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(min = 2, max = 20, message = "Field must be between 2 and 20 characters long.")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(
        custom(function = "email_address"),
        email(message = "Invalid email address.")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(min = 8, max = 20, message = "Field must be between 8 and 20 characters long.")
    )]
    pub password: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        must_match(other = "password", message = "Field must be equal to password.")
    )]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(
        custom(function = "email_address"),
        email(message = "Invalid email address.")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(min = 8, max = 20, message = "Field must be between 8 and 20 characters long.")
    )]
    pub password: String,
}

/// Only the shape is checked here; the comparison against the issued code
/// happens in the verification workflow.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VerifyRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(equal = 6, message = "Field must be exactly 6 characters long.")
    )]
    pub ver_code: String,
}

/// Flattens `ValidationErrors` into per-field messages, in form order.
fn into_field_errors(errors: &ValidationErrors, order: &[&str]) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    let mut out = Vec::new();

    for &field in order {
        let Some(field_errors) = by_field.get(field) else {
            continue;
        };
        if field_errors.iter().any(|e| e.code == REQUIRED_CODE) {
            out.push(FieldError::new(field, REQUIRED_MESSAGE));
            continue;
        }
        let mut messages: Vec<String> = Vec::new();
        for error in field_errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid value.".to_string());
            if !messages.contains(&message) {
                messages.push(message);
            }
        }
        out.extend(messages.into_iter().map(|message| FieldError::new(field, message)));
    }

    out
}

fn check<T: Validate>(form: &T, order: &[&str]) -> Result<(), Vec<FieldError>> {
    form.validate()
        .map_err(|errors| into_field_errors(&errors, order))
}

pub fn validate_signup(data: &SignupData) -> Result<(), Vec<FieldError>> {
    check(data, &["name", "email", "password", "confirm_password"])
}

pub fn validate_login(form: &LoginRequest) -> Result<(), Vec<FieldError>> {
    check(form, &["email", "password"])
}

pub fn validate_code(candidate: &str) -> Result<(), Vec<FieldError>> {
    check(&VerifyRequest { ver_code: candidate.to_string() }, &["ver_code"])
}
