use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

use super::{FormErrors, REQUIRED};
use crate::domain::{USERNAME_MAX_LENGTH, User};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";

/// Account registration form. E-mail is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(custom(function = "valid_username"))]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    #[validate(custom(function = "valid_password"))]
    pub password1: String,
    #[validate(must_match(other = "password1", message = "The two password fields didn't match."))]
    pub password2: String,
}

impl SignupForm {
    /// Trim the identifying fields and run every check that needs no storage.
    pub fn clean(mut self) -> Result<Self, (Self, FormErrors)> {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();

        match self.validate() {
            Ok(()) => Ok(self),
            Err(errors) => Err((self, FormErrors::from(errors))),
        }
    }
}

fn valid_username(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(REQUIRED.into()));
    }
    if !User::is_valid_username(value) {
        return Err(ValidationError::new("username").with_message(
            format!(
                "Enter a valid username of at most {USERNAME_MAX_LENGTH} characters: letters, digits and @/./+/-/_ only."
            )
            .into(),
        ));
    }
    Ok(())
}

fn optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(INVALID_EMAIL.into()))
}

fn valid_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message(REQUIRED.into()));
    }
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_short").with_message(
            format!(
                "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
            )
            .into(),
        ));
    }
    Ok(())
}
