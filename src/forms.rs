//! Form input helpers: sanitization, per-field errors and id parsing

use chrono::{DateTime, NaiveDate};
use uuid::Uuid;
use validator::ValidationErrors;

/// A validation message attached to one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validation messages for a rejected form, in form-field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    /// Collect the messages of a `validator` run for the given fields
    pub fn collect(result: Result<(), ValidationErrors>, fields: &[&'static str]) -> Self {
        let mut errors = Self::default();
        if let Err(validation) = result {
            let by_field = validation.field_errors();
            for field in fields {
                if let Some(list) = by_field.get(*field) {
                    for err in list.iter() {
                        let message = err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for {}", field));
                        errors.push(field, message);
                    }
                }
            }
        }
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Stable-sort messages to follow the order of `fields`
    pub fn order_by(&mut self, fields: &[&'static str]) {
        self.errors.sort_by_key(|e| {
            fields
                .iter()
                .position(|f| *f == e.field)
                .unwrap_or(fields.len())
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages reported for one field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Trim surrounding whitespace and drop control characters
pub fn sanitize(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

/// Sanitize an optional input, treating an empty result as absent
pub fn sanitize_optional(value: Option<String>) -> Option<String> {
    value.map(|v| sanitize(&v)).filter(|v| !v.is_empty())
}

/// ASCII letters and digits only; the empty string is not alphanumeric
pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// True when `value` holds more than `max` characters
pub fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

/// Parse an ISO-8601 calendar date, or the date part of an RFC 3339 timestamp
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn parse_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}

/// Parse identifiers keeping the first occurrence of each; returns the
/// parsed ids and whether any entry failed to parse
pub fn parse_id_list(values: &[String]) -> (Vec<Uuid>, bool) {
    let mut ids = Vec::with_capacity(values.len());
    let mut invalid = false;
    for value in values {
        match parse_id(value) {
            Some(id) if !ids.contains(&id) => ids.push(id),
            Some(_) => {}
            None => invalid = true,
        }
    }
    (ids, invalid)
}

/// Format a date the way catalog pages display it
pub fn display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
