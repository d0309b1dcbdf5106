//! Catalog page integration tests
//!
//! Drive the full router in-process over the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use local_library::{
    api,
    config::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    models::{BookInstanceData, InstanceStatus},
    repository::{CatalogStore, MemoryRepository},
    services::Services,
    AppState,
};

struct TestApp {
    router: Router,
    store: Arc<MemoryRepository>,
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

fn app() -> TestApp {
    let store = Arc::new(MemoryRepository::new());
    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "memory://".to_string(),
            ..DatabaseConfig::default()
        },
        logging: LoggingConfig::default(),
    };
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(store.clone())),
    };
    TestApp {
        router: api::router(state),
        store,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Reply {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&self, uri: &str) -> Reply {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, form: &str) -> Reply {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Create a record through its form and return the id from the redirect
    async fn create(&self, uri: &str, form: &str) -> Uuid {
        let reply = self.post(uri, form).await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "{}", reply.body);
        let location = reply.location.expect("redirect location");
        let id = location.rsplit('/').next().unwrap();
        Uuid::parse_str(id).unwrap()
    }

    async fn create_author(&self, first: &str, last: &str) -> Uuid {
        let form = format!("first_name={}&last_name={}&date_of_birth=1920-01-02&date_of_death=", first, last);
        self.create("/catalog/authors/create", &form).await
    }

    async fn create_genre(&self, name: &str) -> Uuid {
        self.create("/catalog/genres/create", &format!("name={}", name)).await
    }

    async fn create_book(&self, title: &str, author: Uuid, genres: &[Uuid]) -> Uuid {
        let mut form = format!(
            "title={}&author={}&summary=A+summary&isbn=9780000000001",
            title, author
        );
        for genre in genres {
            form.push_str(&format!("&genre={}", genre));
        }
        self.create("/catalog/books/create", &form).await
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let reply = app.get("/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(body["status"], "healthy");

    let reply = app.get("/ready").await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_root_redirects_to_catalog() {
    let reply = app().get("/").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog"));
}

#[tokio::test]
async fn test_create_author_redirects_to_detail() {
    let app = app();
    let id = app.create_author("Isaac", "Asimov").await;

    let reply = app.get(&format!("/catalog/authors/{}", id)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Asimov, Isaac"));
    assert!(reply.body.contains("This author has no books."));

    let list = app.get("/catalog/authors").await;
    assert!(list.body.contains(&format!("/catalog/authors/{}", id)));
}

#[tokio::test]
async fn test_create_author_missing_name_rerenders_form() {
    let app = app();
    let reply = app
        .post("/catalog/authors/create", "first_name=Isaac&last_name=")
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Last name must be specified"));
    assert!(reply.body.contains("value=\"Isaac\""));
    assert_eq!(app.store.authors_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_author_keeps_id() {
    let app = app();
    let id = app.create_author("Isaac", "Asimov").await;

    let reply = app
        .post(
            &format!("/catalog/authors/{}/update", id),
            "first_name=Isaac&last_name=Azimov",
        )
        .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location, Some(format!("/catalog/authors/{}", id)));

    let author = app.store.authors_get(id).await.unwrap().unwrap();
    assert_eq!(author.last_name, "Azimov");
    assert_eq!(author.date_of_birth, None);
}

#[tokio::test]
async fn test_genre_create_is_case_insensitive() {
    let app = app();
    let first = app.create_genre("Fiction").await;
    let second = app.create_genre("fiction").await;

    assert_eq!(first, second);
    assert_eq!(app.store.genres_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_genre_name_too_short() {
    let app = app();
    let reply = app.post("/catalog/genres/create", "name=Sf").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Genre name must contain at least 3 characters."));
}

#[tokio::test]
async fn test_book_form_accepts_single_and_repeated_genres() {
    let app = app();
    let author = app.create_author("Ursula", "LeGuin").await;
    let fantasy = app.create_genre("Fantasy").await;
    let scifi = app.create_genre("Science+Fiction").await;

    let single = app.create_book("Earthsea", author, &[fantasy]).await;
    let both = app.create_book("Lathe", author, &[scifi, fantasy]).await;
    let none = app.create_book("Essays", author, &[]).await;

    let single = app.store.books_get(single).await.unwrap().unwrap();
    assert_eq!(single.genre_ids, vec![fantasy]);
    let both = app.store.books_get(both).await.unwrap().unwrap();
    assert_eq!(both.genre_ids, vec![scifi, fantasy]);
    let none = app.store.books_get(none).await.unwrap().unwrap();
    assert!(none.genre_ids.is_empty());

    let detail = app.get(&format!("/catalog/books/{}", both.id)).await;
    assert!(detail.body.contains("Science Fiction"));
    assert!(detail.body.contains("LeGuin, Ursula"));
}

#[tokio::test]
async fn test_book_form_with_unknown_author_is_rejected() {
    let app = app();
    let form = format!(
        "title=Ghost&author={}&summary=Nobody&isbn=123",
        Uuid::new_v4()
    );
    let reply = app.post("/catalog/books/create", &form).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Author does not exist."));
    assert_eq!(app.store.books_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_author_delete_blocked_by_books() {
    let app = app();
    let author = app.create_author("Mary", "Shelley").await;
    let book = app.create_book("Frankenstein", author, &[]).await;

    let reply = app
        .post(
            &format!("/catalog/authors/{}/delete", author),
            &format!("authorid={}", author),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Frankenstein"));
    assert!(app.store.authors_get(author).await.unwrap().is_some());

    // remove the book, then the author can go
    let reply = app
        .post(&format!("/catalog/books/{}/delete", book), "")
        .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);

    let reply = app
        .post(
            &format!("/catalog/authors/{}/delete", author),
            &format!("authorid={}", author),
        )
        .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/authors"));
    assert!(app.store.authors_get(author).await.unwrap().is_none());
}

#[tokio::test]
async fn test_genre_delete_blocked_by_books() {
    let app = app();
    let author = app.create_author("Mary", "Shelley").await;
    let genre = app.create_genre("Gothic").await;
    app.create_book("Frankenstein", author, &[genre]).await;

    let page = app.get(&format!("/catalog/genres/{}/delete", genre)).await;
    assert!(page.body.contains("Delete the following books"));

    let reply = app
        .post(&format!("/catalog/genres/{}/delete", genre), "")
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(app.store.genres_get(genre).await.unwrap().is_some());
}

#[tokio::test]
async fn test_book_delete_removes_instances() {
    let app = app();
    let author = app.create_author("Mary", "Shelley").await;
    let book = app.create_book("Frankenstein", author, &[]).await;
    for status in [InstanceStatus::Available, InstanceStatus::Loaned] {
        app.store
            .instances_create(&BookInstanceData {
                book_id: book,
                imprint: "Penguin, 2003".into(),
                status,
                due_back: None,
            })
            .await
            .unwrap();
    }

    let page = app.get(&format!("/catalog/books/{}/delete", book)).await;
    assert!(page.body.contains("Penguin, 2003"));

    let reply = app
        .post(
            &format!("/catalog/books/{}/delete", book),
            &format!("bookid={}", book),
        )
        .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert!(app.store.books_get(book).await.unwrap().is_none());
    assert_eq!(app.store.instances_count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_with_mismatched_body_id_is_bad_request() {
    let app = app();
    let author = app.create_author("Mary", "Shelley").await;

    let reply = app
        .post(
            &format!("/catalog/authors/{}/delete", author),
            &format!("authorid={}", Uuid::new_v4()),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(app.store.authors_get(author).await.unwrap().is_some());
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = app();
    let author = app.create_author("Mary", "Shelley").await;
    app.create_genre("Gothic").await;
    let book = app.create_book("Frankenstein", author, &[]).await;
    for status in [InstanceStatus::Available, InstanceStatus::Maintenance] {
        app.store
            .instances_create(&BookInstanceData {
                book_id: book,
                imprint: "Penguin".into(),
                status,
                due_back: None,
            })
            .await
            .unwrap();
    }

    let reply = app.get("/catalog").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("<span id=\"book-count\">1</span>"));
    assert!(reply.body.contains("<span id=\"book-instance-count\">2</span>"));
    assert!(reply.body.contains("<span id=\"book-instance-available-count\">1</span>"));
    assert!(reply.body.contains("<span id=\"author-count\">1</span>"));
    assert!(reply.body.contains("<span id=\"genre-count\">1</span>"));
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = app();
    for uri in [
        format!("/catalog/authors/{}", Uuid::new_v4()),
        format!("/catalog/books/{}", Uuid::new_v4()),
        format!("/catalog/genres/{}/update", Uuid::new_v4()),
        "/catalog/authors/not-an-id".to_string(),
    ] {
        let reply = app.get(&uri).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let reply = app
        .get(&format!("/catalog/authors/{}/delete", Uuid::new_v4()))
        .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/authors"));
}

#[tokio::test]
async fn test_overlong_genre_name_rerenders_form() {
    let app = app();
    let reply = app
        .post("/catalog/genres/create", &format!("name={}", "A".repeat(150)))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Genre name must be at most 100 characters."));
    assert_eq!(app.store.genres_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_without_form_body() {
    let app = app();
    let genre = app.create_genre("Poetry").await;

    let request = Request::post(format!("/catalog/genres/{}/delete", genre))
        .body(Body::empty())
        .unwrap();
    let reply = app.send(request).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert!(app.store.genres_get(genre).await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_form_renders_error_page() {
    let app = app();
    let reply = app
        .post("/catalog/genres/create", "name=Fiction&name=Drama")
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body.contains("<!DOCTYPE html>"));
    assert!(reply.body.contains("Status 400 (BadValue)"));
    assert_eq!(app.store.genres_count().await.unwrap(), 0);
}
