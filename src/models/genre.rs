//! Genre model and form

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::forms::{self, FormErrors};

use super::CATALOG_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("{}/genres/{}", CATALOG_PREFIX, self.id)
    }
}

/// Validated genre fields ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreData {
    pub name: String,
}

/// Longest genre name the store accepts, in characters
pub const NAME_MAX_LEN: usize = 100;

/// Genre create/update form submission
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GenreForm {
    #[serde(default)]
    #[validate(length(min = 3, message = "Genre name must contain at least 3 characters."))]
    pub name: String,
}

impl GenreForm {
    pub const FIELDS: &'static [&'static str] = &["name"];

    pub fn from_genre(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }

    pub fn sanitized(self) -> Self {
        Self {
            name: forms::sanitize(&self.name),
        }
    }

    pub fn check(&self) -> Result<GenreData, FormErrors> {
        let mut errors = FormErrors::collect(self.validate(), Self::FIELDS);
        if forms::exceeds(&self.name, NAME_MAX_LEN) {
            errors.push(
                "name",
                format!("Genre name must be at most {} characters.", NAME_MAX_LEN),
            );
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(GenreData {
            name: self.name.clone(),
        })
    }
}
