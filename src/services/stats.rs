//! Statistics service: catalog counts for the home page

use std::sync::Arc;

use crate::{error::AppResult, models::InstanceStatus, repository::CatalogStore};

/// Collection cardinalities shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub books: i64,
    pub authors: i64,
    pub book_instances: i64,
    pub book_instances_available: i64,
    pub genres: i64,
}

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn CatalogStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// The five dashboard counts, read concurrently
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let (books, authors, book_instances, book_instances_available, genres) = tokio::try_join!(
            self.store.books_count(),
            self.store.authors_count(),
            self.store.instances_count(None),
            self.store.instances_count(Some(InstanceStatus::Available)),
            self.store.genres_count()
        )?;

        Ok(CatalogCounts {
            books,
            authors,
            book_instances,
            book_instances_available,
            genres,
        })
    }
}
