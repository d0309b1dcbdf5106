//! Author model and form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::forms::{self, FormErrors};

use super::CATALOG_PREFIX;

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Display name, `"<last_name>, <first_name>"`
    pub fn name(&self) -> String {
        match (self.last_name.is_empty(), self.first_name.is_empty()) {
            (false, false) => format!("{}, {}", self.last_name, self.first_name),
            (false, true) => self.last_name.clone(),
            (true, _) => self.first_name.clone(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/authors/{}", CATALOG_PREFIX, self.id)
    }

    pub fn lifespan(&self) -> String {
        let birth = self.date_of_birth.map(forms::display_date).unwrap_or_default();
        let death = self.date_of_death.map(forms::display_date).unwrap_or_default();
        if birth.is_empty() && death.is_empty() {
            String::new()
        } else {
            format!("{} - {}", birth, death)
        }
    }
}

/// Validated author fields ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorData {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Longest first or last name the store accepts, in characters
pub const NAME_MAX_LEN: usize = 100;

/// Author create/update form submission
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "First name must be specified"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Last name must be specified"))]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub date_of_death: Option<String>,
}

impl AuthorForm {
    pub const FIELDS: &'static [&'static str] =
        &["first_name", "last_name", "date_of_birth", "date_of_death"];

    /// Prefill from a stored author
    pub fn from_author(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
            date_of_death: author.date_of_death.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }

    pub fn sanitized(self) -> Self {
        Self {
            first_name: forms::sanitize(&self.first_name),
            last_name: forms::sanitize(&self.last_name),
            date_of_birth: forms::sanitize_optional(self.date_of_birth),
            date_of_death: forms::sanitize_optional(self.date_of_death),
        }
    }

    /// Validate a sanitized form, returning the data to persist or the
    /// per-field messages
    pub fn check(&self) -> Result<AuthorData, FormErrors> {
        let mut errors = FormErrors::collect(self.validate(), Self::FIELDS);

        if !self.first_name.is_empty() && !forms::is_alphanumeric(&self.first_name) {
            errors.push("first_name", "First name has non-alphanumeric characters.");
        }
        if !self.last_name.is_empty() && !forms::is_alphanumeric(&self.last_name) {
            errors.push("last_name", "Last name has non-alphanumeric characters.");
        }
        if forms::exceeds(&self.first_name, NAME_MAX_LEN) {
            errors.push(
                "first_name",
                format!("First name must be at most {} characters.", NAME_MAX_LEN),
            );
        }
        if forms::exceeds(&self.last_name, NAME_MAX_LEN) {
            errors.push(
                "last_name",
                format!("Last name must be at most {} characters.", NAME_MAX_LEN),
            );
        }

        let date_of_birth = match self.date_of_birth.as_deref() {
            Some(raw) => match forms::parse_date(raw) {
                Some(date) => Some(date),
                None => {
                    errors.push("date_of_birth", "Invalid date of birth");
                    None
                }
            },
            None => None,
        };
        let date_of_death = match self.date_of_death.as_deref() {
            Some(raw) => match forms::parse_date(raw) {
                Some(date) => Some(date),
                None => {
                    errors.push("date_of_death", "Invalid date of death");
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            errors.order_by(Self::FIELDS);
            return Err(errors);
        }

        Ok(AuthorData {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth,
            date_of_death,
        })
    }
}
