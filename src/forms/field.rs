use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::resource::{FieldKind, FieldSpec};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} must be a whole number")]
    NotAnInteger(&'static str),

    #[error("{0} must be a date (YYYY-MM-DD)")]
    NotADate(&'static str),
}

/// Turns raw form input into the JSON value sent to the server. Blank input is `None` for
/// optional fields and an error for required ones.
pub fn coerce(spec: &FieldSpec, raw: &str) -> Result<Option<Value>, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return if spec.required {
            Err(FieldError::Required(spec.label))
        } else {
            Ok(None)
        };
    }

    let value = match spec.kind {
        FieldKind::Text | FieldKind::Reference(_) => Value::String(raw.to_owned()),
        FieldKind::Integer => raw
            .parse::<i32>()
            .map(Value::from)
            .map_err(|_| FieldError::NotAnInteger(spec.label))?,
        FieldKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(|date| Value::String(date.format(DATE_FORMAT).to_string()))
            .map_err(|_| FieldError::NotADate(spec.label))?,
    };

    Ok(Some(value))
}
