//! Business logic services

pub mod authors;
pub mod books;
pub mod genres;
pub mod stats;

use std::sync::Arc;

use crate::{forms::FormErrors, repository::CatalogStore};

/// Outcome of a create or update form submission
#[derive(Debug)]
pub enum Submission<T, F> {
    /// Persisted; redirect to the record
    Saved(T),
    /// An equivalent record already exists; redirect to it instead
    Existing(T),
    /// Validation failed; re-show the sanitized form with its errors
    Rejected { form: F, errors: FormErrors },
}

/// Outcome of a guarded delete
#[derive(Debug)]
pub enum Removal<T> {
    Removed,
    Missing,
    /// Dependents exist; the confirmation page is shown instead
    Blocked(T),
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub genres: genres::GenresService,
    pub stats: stats::StatsService,
    store: Arc<dyn CatalogStore>,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            authors: authors::AuthorsService::new(store.clone()),
            books: books::BooksService::new(store.clone()),
            genres: genres::GenresService::new(store.clone()),
            stats: stats::StatsService::new(store.clone()),
            store,
        }
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> crate::AppResult<()> {
        self.store.ping().await
    }
}
