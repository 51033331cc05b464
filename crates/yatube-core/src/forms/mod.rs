//! Validation forms for the user-editable records.
//!
//! A form turns raw submitted values into either a cleaned value ready to be
//! persisted or a [`FormErrors`] map used to re-render the form with the
//! user's input intact.

mod comment;
mod post;
mod signup;

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

pub use comment::CommentForm;
pub use post::{CleanedPost, ImageUpload, PostForm, ValidImage};
pub use signup::{INVALID_EMAIL, MIN_PASSWORD_LENGTH, PASSWORD_MISMATCH, SignupForm};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Field name -> messages, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.add(field.to_string(), message);
            }
        }
        form_errors
    }
}

/// Widget a field is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Textarea,
    Select,
    File,
}

/// Static description of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

/// A field as handed to the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldContext {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub value: Option<String>,
    pub errors: Vec<String>,
}

impl FieldContext {
    fn new(meta: &FieldMeta, value: Option<String>, errors: &FormErrors) -> Self {
        Self {
            name: meta.name,
            label: meta.label,
            help_text: meta.help_text,
            required: meta.required,
            kind: meta.kind,
            value,
            errors: errors.get(meta.name).to_vec(),
        }
    }
}

/// One `<option>` of a select field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceContext {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Everything a template needs to render a bound form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormContext {
    pub fields: Vec<FieldContext>,
    pub choices: BTreeMap<&'static str, Vec<ChoiceContext>>,
    pub errors: FormErrors,
}

impl FormContext {
    pub fn field(&self, name: &str) -> Option<&FieldContext> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Rejects empty or whitespace-only text.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(REQUIRED.into()));
    }
    Ok(())
}
