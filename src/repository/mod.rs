//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod genres;
pub mod instances;
pub mod memory;


use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, AuthorData, Book, BookData, BookInstance, BookInstanceData, Genre, GenreData,
        InstanceStatus,
    },
};

pub use memory::MemoryRepository;

/// Result of a delete guarded by a dependents check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    Missing,
    /// Books still reference the record; nothing was removed
    Referenced,
}

/// Storage operations the catalog services rely on.
///
/// Lists are returned in display order: authors by last name, genres by
/// name, books by title.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn authors_create(&self, data: &AuthorData) -> AppResult<Author>;
    async fn authors_update(&self, id: Uuid, data: &AuthorData) -> AppResult<Option<Author>>;
    /// Delete the author unless a book references it, in one store operation
    async fn authors_delete_unreferenced(&self, id: Uuid) -> AppResult<Deletion>;
    async fn authors_count(&self) -> AppResult<i64>;

    async fn genres_list(&self) -> AppResult<Vec<Genre>>;
    async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>>;
    async fn genres_get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>>;
    /// Case-insensitive lookup by name
    async fn genres_find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    /// Fails with a unique violation when the name is taken, ignoring case
    async fn genres_create(&self, data: &GenreData) -> AppResult<Genre>;
    async fn genres_update(&self, id: Uuid, data: &GenreData) -> AppResult<Option<Genre>>;
    async fn genres_delete_unreferenced(&self, id: Uuid) -> AppResult<Deletion>;
    async fn genres_count(&self) -> AppResult<i64>;

    async fn books_list(&self) -> AppResult<Vec<Book>>;
    async fn books_get(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>>;
    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>>;
    async fn books_create(&self, data: &BookData) -> AppResult<Book>;
    async fn books_update(&self, id: Uuid, data: &BookData) -> AppResult<Option<Book>>;
    /// Delete the book and all of its instances; false when the book is absent
    async fn books_delete(&self, id: Uuid) -> AppResult<bool>;
    async fn books_count(&self) -> AppResult<i64>;

    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn instances_create(&self, data: &BookInstanceData) -> AppResult<BookInstance>;
    /// Count all instances, or only those with the given status
    async fn instances_count(&self, status: Option<InstanceStatus>) -> AppResult<i64>;
}

/// PostgreSQL-backed store holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        self.authors_list_sorted().await
    }

    async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.authors_get_by_id(id).await
    }

    async fn authors_create(&self, data: &AuthorData) -> AppResult<Author> {
        self.authors_insert(data).await
    }

    async fn authors_update(&self, id: Uuid, data: &AuthorData) -> AppResult<Option<Author>> {
        self.authors_update_by_id(id, data).await
    }

    async fn authors_delete_unreferenced(&self, id: Uuid) -> AppResult<Deletion> {
        self.authors_delete_if_unreferenced(id).await
    }

    async fn authors_count(&self) -> AppResult<i64> {
        self.authors_count_all().await
    }

    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        self.genres_list_sorted().await
    }

    async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        self.genres_get_by_id(id).await
    }

    async fn genres_get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        self.genres_get_by_ids(ids).await
    }

    async fn genres_find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        self.genres_find_by_name_ci(name).await
    }

    async fn genres_create(&self, data: &GenreData) -> AppResult<Genre> {
        self.genres_insert(data).await
    }

    async fn genres_update(&self, id: Uuid, data: &GenreData) -> AppResult<Option<Genre>> {
        self.genres_update_by_id(id, data).await
    }

    async fn genres_delete_unreferenced(&self, id: Uuid) -> AppResult<Deletion> {
        self.genres_delete_if_unreferenced(id).await
    }

    async fn genres_count(&self) -> AppResult<i64> {
        self.genres_count_all().await
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        self.books_list_sorted().await
    }

    async fn books_get(&self, id: Uuid) -> AppResult<Option<Book>> {
        self.books_get_by_id(id).await
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        self.books_find_by_author(author_id).await
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        self.books_find_by_genre(genre_id).await
    }

    async fn books_create(&self, data: &BookData) -> AppResult<Book> {
        self.books_insert(data).await
    }

    async fn books_update(&self, id: Uuid, data: &BookData) -> AppResult<Option<Book>> {
        self.books_update_by_id(id, data).await
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<bool> {
        self.books_delete_with_instances(id).await
    }

    async fn books_count(&self) -> AppResult<i64> {
        self.books_count_all().await
    }

    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        self.instances_find_by_book(book_id).await
    }

    async fn instances_create(&self, data: &BookInstanceData) -> AppResult<BookInstance> {
        self.instances_insert(data).await
    }

    async fn instances_count(&self, status: Option<InstanceStatus>) -> AppResult<i64> {
        self.instances_count_by_status(status).await
    }
}
