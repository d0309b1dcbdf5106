//! Author service

use std::sync::Arc;
use uuid::Uuid;

use super::{Removal, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, Book},
    repository::{CatalogStore, Deletion},
};

/// An author with the books that reference it
#[derive(Debug, Clone)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct AuthorsService {
    store: Arc<dyn CatalogStore>,
}

impl AuthorsService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// All authors, sorted by last name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.store.authors_list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Author> {
        self.store
            .authors_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Author and its books, read concurrently; `None` when the author is absent
    async fn find_with_books(&self, id: Uuid) -> AppResult<(Option<Author>, Vec<Book>)> {
        tokio::try_join!(self.store.authors_get(id), self.store.books_by_author(id))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorDetail> {
        match self.find_with_books(id).await? {
            (Some(author), books) => Ok(AuthorDetail { author, books }),
            (None, _) => Err(AppError::NotFound(format!("Author {} not found", id))),
        }
    }

    /// Data for the delete confirmation page; `None` when the author is absent
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        let (author, books) = self.find_with_books(id).await?;
        Ok(author.map(|author| AuthorDetail { author, books }))
    }

    pub async fn create(&self, form: AuthorForm) -> AppResult<Submission<Author, AuthorForm>> {
        let form = form.sanitized();
        let data = match form.check() {
            Ok(data) => data,
            Err(errors) => return Ok(Submission::Rejected { form, errors }),
        };

        let author = self.store.authors_create(&data).await?;
        tracing::info!("Created author {} ({})", author.id, author.name());
        Ok(Submission::Saved(author))
    }

    pub async fn update(
        &self,
        id: Uuid,
        form: AuthorForm,
    ) -> AppResult<Submission<Author, AuthorForm>> {
        let form = form.sanitized();
        let data = match form.check() {
            Ok(data) => data,
            Err(errors) => return Ok(Submission::Rejected { form, errors }),
        };

        let author = self
            .store
            .authors_update(id, &data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
        tracing::info!("Updated author {}", id);
        Ok(Submission::Saved(author))
    }

    /// Delete the author unless books still reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<Removal<AuthorDetail>> {
        let (author, books) = self.find_with_books(id).await?;
        let author = match author {
            Some(author) => author,
            None => return Ok(Removal::Missing),
        };

        if !books.is_empty() {
            tracing::info!("Refusing to delete author {}: {} book(s) reference it", id, books.len());
            return Ok(Removal::Blocked(AuthorDetail { author, books }));
        }

        match self.store.authors_delete_unreferenced(id).await? {
            Deletion::Deleted => {
                tracing::info!("Deleted author {}", id);
                Ok(Removal::Removed)
            }
            Deletion::Missing => Ok(Removal::Missing),
            Deletion::Referenced => {
                tracing::warn!("Author {} gained a book before it could be deleted", id);
                let books = self.store.books_by_author(id).await?;
                Ok(Removal::Blocked(AuthorDetail { author, books }))
            }
        }
    }
}
