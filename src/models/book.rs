//! Book model and form

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::forms::{self, FormErrors};

use super::{author::Author, book_instance::BookInstance, genre::Genre, CATALOG_PREFIX};

/// Full book model from database; `genre_ids` keeps the submitted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Uuid,
    pub genre_ids: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        format!("{}/books/{}", CATALOG_PREFIX, self.id)
    }
}

/// Book with its author resolved, for list pages
#[derive(Debug, Clone)]
pub struct BookListing {
    pub book: Book,
    pub author: Option<Author>,
}

/// Book with every reference resolved, for the detail page
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

/// Validated book fields ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookData {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Uuid,
    pub genre_ids: Vec<Uuid>,
}

/// Longest ISBN the store accepts, in characters
pub const ISBN_MAX_LEN: usize = 32;

/// Book create/update form submission.
///
/// `genre` arrives absent, once or repeated; it is always deserialized as a
/// list.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Author must not be empty."))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl BookForm {
    pub const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre_ids.iter().map(Uuid::to_string).collect(),
        }
    }

    pub fn sanitized(self) -> Self {
        Self {
            title: forms::sanitize(&self.title),
            author: forms::sanitize(&self.author),
            summary: forms::sanitize(&self.summary),
            isbn: forms::sanitize(&self.isbn),
            genre: self
                .genre
                .iter()
                .map(|g| forms::sanitize(g))
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }

    /// Selected author id, if the field holds one
    pub fn author_id(&self) -> Option<Uuid> {
        forms::parse_id(&self.author)
    }

    /// Selected genre ids, first occurrence wins
    pub fn genre_ids(&self) -> Vec<Uuid> {
        forms::parse_id_list(&self.genre).0
    }

    pub fn check(&self) -> Result<BookData, FormErrors> {
        let mut errors = FormErrors::collect(self.validate(), Self::FIELDS);

        if forms::exceeds(&self.isbn, ISBN_MAX_LEN) {
            errors.push("isbn", format!("ISBN must be at most {} characters.", ISBN_MAX_LEN));
        }

        let author_id = self.author_id();
        if author_id.is_none() && !self.author.is_empty() {
            errors.push("author", "Author is not valid.");
        }

        let (genre_ids, invalid_genre) = forms::parse_id_list(&self.genre);
        if invalid_genre {
            errors.push("genre", "Genre selection is not valid.");
        }

        match author_id {
            Some(author_id) if errors.is_empty() => Ok(BookData {
                title: self.title.clone(),
                summary: self.summary.clone(),
                isbn: self.isbn.clone(),
                author_id,
                genre_ids,
            }),
            _ => {
                errors.order_by(Self::FIELDS);
                Err(errors)
            }
        }
    }
}
