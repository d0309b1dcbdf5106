//! Book service

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{Removal, Submission};
use crate::{
    error::{AppError, AppResult},
    forms::FormErrors,
    models::{
        Author, Book, BookData, BookDetail, BookForm, BookInstance, BookListing, Genre,
    },
    repository::CatalogStore,
};

/// Authors and genres offered by the book form
#[derive(Debug, Clone, Default)]
pub struct FormChoices {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

/// Result of checking a submitted book form
enum Checked {
    Valid(BookData),
    Invalid(BookForm, FormErrors),
}

/// A book and the copies that go with it when it is deleted
#[derive(Debug, Clone)]
pub struct BookDeletePreview {
    pub book: Book,
    pub instances: Vec<BookInstance>,
}

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn CatalogStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// All books sorted by title, each with its author resolved
    pub async fn list(&self) -> AppResult<Vec<BookListing>> {
        let (books, authors) = tokio::try_join!(self.store.books_list(), self.store.authors_list())?;
        let authors: HashMap<Uuid, Author> = authors.into_iter().map(|a| (a.id, a)).collect();

        Ok(books
            .into_iter()
            .map(|book| {
                let author = authors.get(&book.author_id).cloned();
                BookListing { book, author }
            })
            .collect())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetail> {
        let (book, instances) =
            tokio::try_join!(self.store.books_get(id), self.store.instances_by_book(id))?;
        let book = book.ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        let (author, mut genres) = tokio::try_join!(
            self.store.authors_get(book.author_id),
            self.store.genres_get_many(&book.genre_ids)
        )?;
        // shown in the order they were picked
        genres.sort_by_key(|g| book.genre_ids.iter().position(|id| *id == g.id));

        Ok(BookDetail {
            book,
            author,
            genres,
            instances,
        })
    }

    /// Authors by last name and genres by name, read concurrently
    pub async fn choices(&self) -> AppResult<FormChoices> {
        let (authors, genres) = tokio::try_join!(self.store.authors_list(), self.store.genres_list())?;
        Ok(FormChoices { authors, genres })
    }

    /// Form prefilled from a stored book, with the choices to render it
    pub async fn edit_form(&self, id: Uuid) -> AppResult<(BookForm, FormChoices)> {
        let (book, authors, genres) = tokio::try_join!(
            self.store.books_get(id),
            self.store.authors_list(),
            self.store.genres_list()
        )?;
        let book = book.ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        Ok((BookForm::from_book(&book), FormChoices { authors, genres }))
    }

    /// Sanitize and validate, then make sure the referenced author and genres exist
    async fn validate(&self, form: BookForm) -> AppResult<Checked> {
        let form = form.sanitized();
        let data = match form.check() {
            Ok(data) => data,
            Err(errors) => return Ok(Checked::Invalid(form, errors)),
        };

        let (author, genres) = tokio::try_join!(
            self.store.authors_get(data.author_id),
            self.store.genres_get_many(&data.genre_ids)
        )?;

        let mut errors = FormErrors::default();
        if author.is_none() {
            errors.push("author", "Author does not exist.");
        }
        if genres.len() != data.genre_ids.len() {
            errors.push("genre", "Genre selection is not valid.");
        }
        if errors.is_empty() {
            Ok(Checked::Valid(data))
        } else {
            Ok(Checked::Invalid(form, errors))
        }
    }

    pub async fn create(&self, form: BookForm) -> AppResult<Submission<Book, BookForm>> {
        let data = match self.validate(form).await? {
            Checked::Valid(data) => data,
            Checked::Invalid(form, errors) => return Ok(Submission::Rejected { form, errors }),
        };

        let book = self.store.books_create(&data).await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(Submission::Saved(book))
    }

    pub async fn update(&self, id: Uuid, form: BookForm) -> AppResult<Submission<Book, BookForm>> {
        let data = match self.validate(form).await? {
            Checked::Valid(data) => data,
            Checked::Invalid(form, errors) => return Ok(Submission::Rejected { form, errors }),
        };

        let book = self
            .store
            .books_update(id, &data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        tracing::info!("Updated book {}", id);
        Ok(Submission::Saved(book))
    }

    /// Data for the delete confirmation page; `None` when the book is absent
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<BookDeletePreview>> {
        let (book, instances) =
            tokio::try_join!(self.store.books_get(id), self.store.instances_by_book(id))?;
        Ok(book.map(|book| BookDeletePreview { book, instances }))
    }

    /// Delete the book together with all of its instances
    pub async fn delete(&self, id: Uuid) -> AppResult<Removal<()>> {
        if self.store.books_delete(id).await? {
            tracing::info!("Deleted book {} and its instances", id);
            Ok(Removal::Removed)
        } else {
            Ok(Removal::Missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{AuthorData, BookInstanceData, GenreData, InstanceStatus},
        repository::MemoryRepository,
    };

    struct Fixture {
        service: BooksService,
        store: Arc<MemoryRepository>,
        author: Author,
        genres: Vec<Genre>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryRepository::new());
        let author = store
            .authors_create(&AuthorData {
                first_name: "Ursula".into(),
                last_name: "LeGuin".into(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        let mut genres = Vec::new();
        for name in ["Fantasy", "Science Fiction"] {
            genres.push(store.genres_create(&GenreData { name: name.into() }).await.unwrap());
        }
        Fixture {
            service: BooksService::new(store.clone()),
            store,
            author,
            genres,
        }
    }

    fn form(author: &Author, genre: Vec<String>) -> BookForm {
        BookForm {
            title: "A Wizard of Earthsea".into(),
            author: author.id.to_string(),
            summary: "Ged learns the true names of things.".into(),
            isbn: "9780547773742".into(),
            genre,
        }
    }

    #[tokio::test]
    async fn test_create_then_detail_resolves_references() {
        let f = fixture().await;
        let genre_ids = vec![f.genres[1].id.to_string(), f.genres[0].id.to_string()];
        let book = match f.service.create(form(&f.author, genre_ids)).await.unwrap() {
            Submission::Saved(book) => book,
            other => panic!("expected saved book, got {:?}", other),
        };
        assert_eq!(book.genre_ids, vec![f.genres[1].id, f.genres[0].id]);

        let detail = f.service.detail(book.id).await.unwrap();
        assert_eq!(detail.book.title, "A Wizard of Earthsea");
        assert_eq!(detail.author, Some(f.author.clone()));
        assert_eq!(detail.genres.len(), 2);
        assert!(detail.instances.is_empty());
    }

    #[tokio::test]
    async fn test_detail_keeps_selected_genre_order() {
        let f = fixture().await;
        // Science Fiction picked before Fantasy
        let genre_ids = vec![f.genres[1].id.to_string(), f.genres[0].id.to_string()];
        let book = match f.service.create(form(&f.author, genre_ids)).await.unwrap() {
            Submission::Saved(book) => book,
            other => panic!("expected saved book, got {:?}", other),
        };

        let detail = f.service.detail(book.id).await.unwrap();
        let names: Vec<_> = detail.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Science Fiction", "Fantasy"]);
    }

    #[tokio::test]
    async fn test_missing_title_is_rejected_and_keeps_selection() {
        let f = fixture().await;
        let mut bad = form(&f.author, vec![f.genres[0].id.to_string()]);
        bad.title = "   ".into();

        match f.service.create(bad).await.unwrap() {
            Submission::Rejected { form, errors } => {
                assert!(errors.has("title"));
                assert_eq!(form.genre_ids(), vec![f.genres[0].id]);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(f.store.books_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_author_is_a_field_error() {
        let f = fixture().await;
        let stranger = Author {
            id: Uuid::new_v4(),
            ..f.author.clone()
        };
        match f.service.create(form(&stranger, vec![])).await.unwrap() {
            Submission::Rejected { errors, .. } => assert!(errors.has("author")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_replaces_genres() {
        let f = fixture().await;
        let book = match f
            .service
            .create(form(&f.author, vec![f.genres[0].id.to_string()]))
            .await
            .unwrap()
        {
            Submission::Saved(book) => book,
            other => panic!("unexpected {:?}", other),
        };

        let mut changed = form(&f.author, vec![]);
        changed.title = "The Tombs of Atuan".into();
        match f.service.update(book.id, changed).await.unwrap() {
            Submission::Saved(updated) => {
                assert_eq!(updated.id, book.id);
                assert!(updated.genre_ids.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }

        let (prefill, choices) = f.service.edit_form(book.id).await.unwrap();
        assert_eq!(prefill.title, "The Tombs of Atuan");
        assert_eq!(choices.genres.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_all_instances() {
        let f = fixture().await;
        let book = match f.service.create(form(&f.author, vec![])).await.unwrap() {
            Submission::Saved(book) => book,
            other => panic!("unexpected {:?}", other),
        };
        for _ in 0..3 {
            f.store
                .instances_create(&BookInstanceData {
                    book_id: book.id,
                    imprint: "Parnassus, 1968".into(),
                    status: InstanceStatus::Loaned,
                    due_back: None,
                })
                .await
                .unwrap();
        }
        assert_eq!(f.service.delete_preview(book.id).await.unwrap().unwrap().instances.len(), 3);

        assert!(matches!(f.service.delete(book.id).await.unwrap(), Removal::Removed));
        assert!(f.store.instances_by_book(book.id).await.unwrap().is_empty());
        assert!(matches!(f.service.delete(book.id).await.unwrap(), Removal::Missing));
        assert!(f.service.delete_preview(book.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_resolves_authors_sorted_by_title() {
        let f = fixture().await;
        for title in ["Voyage", "Always Coming Home"] {
            let mut book = form(&f.author, vec![]);
            book.title = title.into();
            f.service.create(book).await.unwrap();
        }
        let listing = f.service.list().await.unwrap();
        let titles: Vec<_> = listing.iter().map(|l| l.book.title.as_str()).collect();
        assert_eq!(titles, vec!["Always Coming Home", "Voyage"]);
        assert!(listing.iter().all(|l| l.author.as_ref() == Some(&f.author)));
    }
}
