//! Field-level validation errors and payload value coercion.
//!
//! Request payloads arrive either as JSON values or as multipart text parts
//! (which are always strings). The coercion helpers here accept both shapes
//! so a movie sent as `{"release_year": 2021}` and one sent as the form part
//! `release_year=2021` validate identically.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_NUMBER: &str = "A valid number is required.";
pub const NOT_A_FILE: &str =
    "The submitted data was not a file. Check the encoding type on the form.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Per-field validation messages, serialized as `{"field": ["message", ...]}`.
///
/// Backed by a `BTreeMap` so the serialized field order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded against `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of all fields that have at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Append every message from `other`.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Unwrap a per-field coercion result, recording the failure message.
    pub fn check<T>(&mut self, field: &str, result: Result<T, &'static str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// `None` means the field was absent from the payload.
fn present(value: Option<&Value>) -> Result<&Value, &'static str> {
    match value {
        None => Err(REQUIRED),
        Some(Value::Null) => Err(NOT_NULL),
        Some(v) => Ok(v),
    }
}

/// Coerce a required text field. Numbers are accepted and stringified;
/// surrounding whitespace is trimmed. Blankness is checked later on the DTO.
pub fn text_value(value: Option<&Value>) -> Result<String, &'static str> {
    match present(value)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(INVALID_STRING),
    }
}

/// Coerce a required 32-bit integer field.
///
/// Accepts JSON integers, integral floats (`2021.0`), and numeric strings
/// with an optional all-zero fraction (`"2021"`, `" 2021.00 "`).
pub fn integer_value(value: Option<&Value>) -> Result<i32, &'static str> {
    let parsed = match present(value)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_integer_text(s),
        _ => None,
    };
    parsed
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(INVALID_INTEGER)
}

fn parse_integer_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let whole = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => trimmed,
    };
    whole.parse().ok()
}

/// Coerce a required finite floating-point field.
pub fn number_value(value: Option<&Value>) -> Result<f64, &'static str> {
    let parsed = match present(value)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).ok_or(INVALID_NUMBER)
}
