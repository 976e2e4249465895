//! Registration contract: normalization plus an injected base validation.
//!
//! Incoming payloads may carry a legacy `username` field; identity for
//! registration purposes is the e-mail address, and the login username is
//! assigned by the persistence layer. The contract therefore discards any
//! client-supplied username before the base checks run, then enforces the
//! required display name on top of the base result.

use crate::AuthError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email regex must compile")
});

const MIN_PASSWORD_LEN: usize = 8;

/// Raw submitted registration fields. Everything is optional at the edge so
/// missing fields surface as field-keyed validation errors instead of
/// deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterAttrs {
    pub email: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
}

/// Outcome of the base validation step.
#[derive(Debug, Clone)]
pub struct BaseValidated {
    pub email: String,
    pub password: String,
}

/// Fully validated registration input, ready to persist.
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// The base validation step, injected into the contract so the
/// normalization logic stays independent of it.
pub trait BaseRegistrationValidator {
    fn validate(&self, attrs: &RegisterAttrs) -> Result<BaseValidated, AuthError>;
}

/// Standard e-mail + confirmed-password validation.
#[derive(Debug, Clone, Default)]
pub struct PasswordRegistrationValidator;

impl BaseRegistrationValidator for PasswordRegistrationValidator {
    fn validate(&self, attrs: &RegisterAttrs) -> Result<BaseValidated, AuthError> {
        let email = attrs
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AuthError::validation("email", "This field is required."))?;

        if !EMAIL_REGEX.is_match(email) {
            return Err(AuthError::validation("email", "Enter a valid e-mail address."));
        }

        let password1 = attrs
            .password1
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AuthError::validation("password1", "This field is required."))?;

        if password1.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(
                "password1",
                format!("This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."),
            ));
        }

        if password1.chars().all(|c| c.is_ascii_digit()) {
            return Err(AuthError::validation(
                "password1",
                "This password is entirely numeric.",
            ));
        }

        match attrs.password2.as_deref() {
            Some(password2) if password2 == password1 => {}
            _ => {
                return Err(AuthError::validation(
                    "password2",
                    "The two password fields didn't match.",
                ))
            }
        }

        Ok(BaseValidated {
            email: email.to_string(),
            password: password1.to_string(),
        })
    }
}

/// Normalizes a registration payload, then runs the injected base
/// validation on the remaining fields.
#[derive(Debug, Clone, Default)]
pub struct RegistrationContract<V = PasswordRegistrationValidator> {
    base: V,
}

impl RegistrationContract<PasswordRegistrationValidator> {
    pub fn new() -> Self {
        Self {
            base: PasswordRegistrationValidator,
        }
    }
}

impl<V: BaseRegistrationValidator> RegistrationContract<V> {
    pub fn with_validator(base: V) -> Self {
        Self { base }
    }

    /// Validate a registration payload.
    ///
    /// Any submitted `username` is discarded *before* the base validation
    /// runs, so a client-supplied value can never interfere with it; the
    /// actual login username is assigned at save time.
    pub fn validate(&self, mut attrs: RegisterAttrs) -> Result<ValidatedRegistration, AuthError> {
        attrs.username = None;

        let base = self.base.validate(&attrs)?;

        let name = attrs
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AuthError::validation("name", "This field is required."))?;

        Ok(ValidatedRegistration {
            email: base.email,
            password: base.password,
            name,
        })
    }
}
