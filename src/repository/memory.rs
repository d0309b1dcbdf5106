//! In-memory catalog store, selected with a `memory://` database url

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogStore, Deletion};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorData, Book, BookData, BookInstance, BookInstanceData, Genre, GenreData,
        InstanceStatus,
    },
};

#[derive(Default)]
struct MemoryState {
    authors: HashMap<Uuid, Author>,
    genres: HashMap<Uuid, Genre>,
    books: HashMap<Uuid, Book>,
    instances: HashMap<Uuid, BookInstance>,
}

impl MemoryState {
    fn genre_name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        let wanted = name.to_lowercase();
        self.genres
            .values()
            .any(|g| Some(g.id) != except && g.name.to_lowercase() == wanted)
    }
}

fn sorted_books(mut books: Vec<Book>) -> Vec<Book> {
    books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
    books
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Catalog store kept entirely in process memory; cloning shares the data
#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryRepository {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let state = self.state.read().await;
        let mut authors: Vec<Author> = state.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then(a.first_name.cmp(&b.first_name))
                .then(a.id.cmp(&b.id))
        });
        Ok(authors)
    }

    async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.state.read().await.authors.get(&id).cloned())
    }

    async fn authors_create(&self, data: &AuthorData) -> AppResult<Author> {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            date_of_birth: data.date_of_birth,
            date_of_death: data.date_of_death,
        };
        self.state
            .write()
            .await
            .authors
            .insert(author.id, author.clone());
        Ok(author)
    }

    async fn authors_update(&self, id: Uuid, data: &AuthorData) -> AppResult<Option<Author>> {
        let mut state = self.state.write().await;
        Ok(state.authors.get_mut(&id).map(|author| {
            author.first_name = data.first_name.clone();
            author.last_name = data.last_name.clone();
            author.date_of_birth = data.date_of_birth;
            author.date_of_death = data.date_of_death;
            author.clone()
        }))
    }

    async fn authors_delete_unreferenced(&self, id: Uuid) -> AppResult<Deletion> {
        let mut state = self.state.write().await;
        if !state.authors.contains_key(&id) {
            return Ok(Deletion::Missing);
        }
        if state.books.values().any(|b| b.author_id == id) {
            return Ok(Deletion::Referenced);
        }
        state.authors.remove(&id);
        Ok(Deletion::Deleted)
    }

    async fn authors_count(&self) -> AppResult<i64> {
        Ok(count(self.state.read().await.authors.len()))
    }

    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let state = self.state.read().await;
        let mut genres: Vec<Genre> = state.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(genres)
    }

    async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.state.read().await.genres.get(&id).cloned())
    }

    async fn genres_get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        let state = self.state.read().await;
        let mut genres: Vec<Genre> = ids
            .iter()
            .filter_map(|id| state.genres.get(id).cloned())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        genres.dedup_by_key(|g| g.id);
        Ok(genres)
    }

    async fn genres_find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let wanted = name.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .genres
            .values()
            .find(|g| g.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn genres_create(&self, data: &GenreData) -> AppResult<Genre> {
        let mut state = self.state.write().await;
        if state.genre_name_taken(&data.name, None) {
            return Err(AppError::Conflict(format!("Genre {} already exists", data.name)));
        }
        let genre = Genre {
            id: Uuid::new_v4(),
            name: data.name.clone(),
        };
        state.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn genres_update(&self, id: Uuid, data: &GenreData) -> AppResult<Option<Genre>> {
        let mut state = self.state.write().await;
        if !state.genres.contains_key(&id) {
            return Ok(None);
        }
        if state.genre_name_taken(&data.name, Some(id)) {
            return Err(AppError::Conflict(format!("Genre {} already exists", data.name)));
        }
        Ok(state.genres.get_mut(&id).map(|genre| {
            genre.name = data.name.clone();
            genre.clone()
        }))
    }

    async fn genres_delete_unreferenced(&self, id: Uuid) -> AppResult<Deletion> {
        let mut state = self.state.write().await;
        if !state.genres.contains_key(&id) {
            return Ok(Deletion::Missing);
        }
        if state.books.values().any(|b| b.genre_ids.contains(&id)) {
            return Ok(Deletion::Referenced);
        }
        state.genres.remove(&id);
        Ok(Deletion::Deleted)
    }

    async fn genres_count(&self) -> AppResult<i64> {
        Ok(count(self.state.read().await.genres.len()))
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;
        Ok(sorted_books(state.books.values().cloned().collect()))
    }

    async fn books_get(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.state.read().await.books.get(&id).cloned())
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;
        Ok(sorted_books(
            state
                .books
                .values()
                .filter(|b| b.author_id == author_id)
                .cloned()
                .collect(),
        ))
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;
        Ok(sorted_books(
            state
                .books
                .values()
                .filter(|b| b.genre_ids.contains(&genre_id))
                .cloned()
                .collect(),
        ))
    }

    async fn books_create(&self, data: &BookData) -> AppResult<Book> {
        let book = Book {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            summary: data.summary.clone(),
            isbn: data.isbn.clone(),
            author_id: data.author_id,
            genre_ids: data.genre_ids.clone(),
        };
        self.state.write().await.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn books_update(&self, id: Uuid, data: &BookData) -> AppResult<Option<Book>> {
        let mut state = self.state.write().await;
        Ok(state.books.get_mut(&id).map(|book| {
            book.title = data.title.clone();
            book.summary = data.summary.clone();
            book.isbn = data.isbn.clone();
            book.author_id = data.author_id;
            book.genre_ids = data.genre_ids.clone();
            book.clone()
        }))
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.books.remove(&id).is_none() {
            return Ok(false);
        }
        state.instances.retain(|_, instance| instance.book_id != id);
        Ok(true)
    }

    async fn books_count(&self) -> AppResult<i64> {
        Ok(count(self.state.read().await.books.len()))
    }

    async fn instances_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let state = self.state.read().await;
        let mut instances: Vec<BookInstance> = state
            .instances
            .values()
            .filter(|i| i.book_id == book_id)
            .cloned()
            .collect();
        instances.sort_by(|a, b| a.imprint.cmp(&b.imprint).then(a.id.cmp(&b.id)));
        Ok(instances)
    }

    async fn instances_create(&self, data: &BookInstanceData) -> AppResult<BookInstance> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&data.book_id) {
            return Err(AppError::NotFound(format!("Book {} not found", data.book_id)));
        }
        let instance = BookInstance {
            id: Uuid::new_v4(),
            book_id: data.book_id,
            imprint: data.imprint.clone(),
            status: data.status,
            due_back: data.due_back,
        };
        state.instances.insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn instances_count(&self, status: Option<InstanceStatus>) -> AppResult<i64> {
        let state = self.state.read().await;
        let n = match status {
            Some(status) => state.instances.values().filter(|i| i.status == status).count(),
            None => state.instances.len(),
        };
        Ok(count(n))
    }
}
