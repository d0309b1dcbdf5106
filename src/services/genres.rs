//! Genre service

use std::sync::Arc;
use uuid::Uuid;

use super::{Removal, Submission};
use crate::{
    error::{AppError, AppResult},
    forms::FormErrors,
    models::{Book, Genre, GenreForm},
    repository::{CatalogStore, Deletion},
};

/// A genre with the books filed under it
#[derive(Debug, Clone)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct GenresService {
    store: Arc<dyn CatalogStore>,
}

impl GenresService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// All genres, sorted by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.store.genres_list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Genre> {
        self.store
            .genres_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }

    async fn find_with_books(&self, id: Uuid) -> AppResult<(Option<Genre>, Vec<Book>)> {
        tokio::try_join!(self.store.genres_get(id), self.store.books_by_genre(id))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<GenreDetail> {
        match self.find_with_books(id).await? {
            (Some(genre), books) => Ok(GenreDetail { genre, books }),
            (None, _) => Err(AppError::NotFound(format!("Genre {} not found", id))),
        }
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        let (genre, books) = self.find_with_books(id).await?;
        Ok(genre.map(|genre| GenreDetail { genre, books }))
    }

    /// Create a genre, or resolve to the existing one whose name matches
    /// ignoring case
    pub async fn create(&self, form: GenreForm) -> AppResult<Submission<Genre, GenreForm>> {
        let form = form.sanitized();
        let data = match form.check() {
            Ok(data) => data,
            Err(errors) => return Ok(Submission::Rejected { form, errors }),
        };

        if let Some(existing) = self.store.genres_find_by_name(&data.name).await? {
            tracing::info!("Genre {:?} already exists as {}", data.name, existing.id);
            return Ok(Submission::Existing(existing));
        }

        match self.store.genres_create(&data).await {
            Ok(genre) => {
                tracing::info!("Created genre {} ({})", genre.id, genre.name);
                Ok(Submission::Saved(genre))
            }
            Err(err) if err.is_unique_violation() => {
                // lost a race with a concurrent create of the same name
                let existing = self
                    .store
                    .genres_find_by_name(&data.name)
                    .await?
                    .ok_or(err)?;
                tracing::info!("Genre {:?} was created concurrently as {}", data.name, existing.id);
                Ok(Submission::Existing(existing))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn update(&self, id: Uuid, form: GenreForm) -> AppResult<Submission<Genre, GenreForm>> {
        let form = form.sanitized();
        let data = match form.check() {
            Ok(data) => data,
            Err(errors) => return Ok(Submission::Rejected { form, errors }),
        };

        match self.store.genres_update(id, &data).await {
            Ok(Some(genre)) => {
                tracing::info!("Updated genre {}", id);
                Ok(Submission::Saved(genre))
            }
            Ok(None) => Err(AppError::NotFound(format!("Genre {} not found", id))),
            Err(err) if err.is_unique_violation() => {
                let mut errors = FormErrors::default();
                errors.push("name", "A genre with this name already exists.");
                Ok(Submission::Rejected { form, errors })
            }
            Err(err) => Err(err),
        }
    }

    /// Delete the genre unless books are still filed under it
    pub async fn delete(&self, id: Uuid) -> AppResult<Removal<GenreDetail>> {
        let (genre, books) = self.find_with_books(id).await?;
        let genre = match genre {
            Some(genre) => genre,
            None => return Ok(Removal::Missing),
        };

        if !books.is_empty() {
            tracing::info!("Refusing to delete genre {}: {} book(s) reference it", id, books.len());
            return Ok(Removal::Blocked(GenreDetail { genre, books }));
        }

        match self.store.genres_delete_unreferenced(id).await? {
            Deletion::Deleted => {
                tracing::info!("Deleted genre {}", id);
                Ok(Removal::Removed)
            }
            Deletion::Missing => Ok(Removal::Missing),
            Deletion::Referenced => {
                tracing::warn!("Genre {} gained a book before it could be deleted", id);
                let books = self.store.books_by_genre(id).await?;
                Ok(Removal::Blocked(GenreDetail { genre, books }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{AuthorData, BookData},
        repository::{MemoryRepository, MockCatalogStore},
    };

    fn service() -> (GenresService, Arc<MemoryRepository>) {
        let store = Arc::new(MemoryRepository::new());
        (GenresService::new(store.clone()), store)
    }

    fn named(name: &str) -> GenreForm {
        GenreForm { name: name.into() }
    }

    #[tokio::test]
    async fn test_create_is_idempotent_ignoring_case() {
        let (service, _) = service();
        let first = match service.create(named("Fiction")).await.unwrap() {
            Submission::Saved(genre) => genre,
            other => panic!("expected saved genre, got {:?}", other),
        };
        match service.create(named("  fiction ")).await.unwrap() {
            Submission::Existing(genre) => assert_eq!(genre.id, first.id),
            other => panic!("expected existing genre, got {:?}", other),
        }
        assert_eq!(service.list().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_short_name_rejected() {
        let (service, _) = service();
        match service.create(named(" ab ")).await.unwrap() {
            Submission::Rejected { form, errors } => {
                assert_eq!(form.name, "ab");
                assert!(errors.has("name"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_is_rejected() {
        let (service, _) = service();
        service.create(named("Poetry")).await.unwrap();
        let drama = match service.create(named("Drama")).await.unwrap() {
            Submission::Saved(genre) => genre,
            other => panic!("unexpected {:?}", other),
        };
        match service.update(drama.id, named("POETRY")).await.unwrap() {
            Submission::Rejected { errors, .. } => assert!(errors.has("name")),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(service.get(drama.id).await.unwrap().name, "Drama");
    }

    #[tokio::test]
    async fn test_delete_guarded_by_books() {
        let (service, store) = service();
        let genre = match service.create(named("Horror")).await.unwrap() {
            Submission::Saved(genre) => genre,
            other => panic!("unexpected {:?}", other),
        };
        let author = store
            .authors_create(&AuthorData {
                first_name: "Shirley".into(),
                last_name: "Jackson".into(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        let book = store
            .books_create(&BookData {
                title: "The Haunting of Hill House".into(),
                summary: "Hill House, not sane".into(),
                isbn: "9780143039983".into(),
                author_id: author.id,
                genre_ids: vec![genre.id],
            })
            .await
            .unwrap();

        match service.delete(genre.id).await.unwrap() {
            Removal::Blocked(detail) => assert_eq!(detail.books[0].id, book.id),
            other => panic!("expected blocked delete, got {:?}", other),
        }
        assert_eq!(store.genres_count().await.unwrap(), 1);

        store.books_delete(book.id).await.unwrap();
        assert!(matches!(service.delete(genre.id).await.unwrap(), Removal::Removed));
        assert!(matches!(
            service.detail(genre.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_create_resolves_to_existing() {
        let winner = Genre {
            id: Uuid::new_v4(),
            name: "Mystery".into(),
        };
        let mut store = MockCatalogStore::new();
        let mut lookups = 0;
        let found = winner.clone();
        store.expect_genres_find_by_name().returning(move |_| {
            lookups += 1;
            Ok(if lookups == 1 { None } else { Some(found.clone()) })
        });
        store
            .expect_genres_create()
            .returning(|_| Err(AppError::Conflict("Genre Mystery already exists".into())));

        let service = GenresService::new(Arc::new(store));
        match service.create(named("mystery")).await.unwrap() {
            Submission::Existing(genre) => assert_eq!(genre, winner),
            other => panic!("expected existing genre, got {:?}", other),
        }
    }
}
