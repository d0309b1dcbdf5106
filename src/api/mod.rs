//! HTTP handlers for the catalog pages

pub mod authors;
pub mod books;
pub mod genres;
pub mod health;
pub mod index;

use axum::{
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::{Form, FormRejection};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    forms,
    models::CATALOG_PREFIX,
    AppState,
};

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(index::index))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/authors/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/authors/:id", get(authors::get_author))
        .route(
            "/authors/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        .route(
            "/authors/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        // Books
        .route("/books", get(books::list_books))
        .route(
            "/books/create",
            get(books::create_book_form).post(books::create_book),
        )
        .route("/books/:id", get(books::get_book))
        .route(
            "/books/:id/update",
            get(books::update_book_form).post(books::update_book),
        )
        .route(
            "/books/:id/delete",
            get(books::delete_book_form).post(books::delete_book),
        )
        // Genres
        .route("/genres", get(genres::list_genres))
        .route(
            "/genres/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/genres/:id", get(genres::get_genre))
        .route(
            "/genres/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        .route(
            "/genres/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to(CATALOG_PREFIX) }))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest(CATALOG_PREFIX, catalog)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Parse a route identifier; anything that is not a UUID names no record
pub(crate) fn parse_id(raw: &str, kind: &str) -> AppResult<Uuid> {
    forms::parse_id(raw).ok_or_else(|| AppError::NotFound(format!("{} {} not found", kind, raw)))
}

/// Body of a delete confirmation; a request without a form body carries no id
pub(crate) fn delete_body<T: Default>(body: Result<Form<T>, FormRejection>) -> AppResult<T> {
    match body {
        Ok(Form(body)) => Ok(body),
        Err(FormRejection::RawFormRejection(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Reject a delete whose hidden body id names a different record than the route
pub(crate) fn check_body_id(route_id: Uuid, body_id: Option<&str>) -> AppResult<()> {
    match body_id.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(()),
        Some(value) if forms::parse_id(value) == Some(route_id) => Ok(()),
        Some(value) => Err(AppError::BadRequest(format!(
            "Submitted id {} does not match {}",
            value, route_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_rejects_garbage_as_not_found() {
        let err = parse_id("not-a-uuid", "Author").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Author").unwrap(), id);
    }

    #[test]
    fn test_check_body_id() {
        let id = Uuid::new_v4();
        assert!(check_body_id(id, None).is_ok());
        assert!(check_body_id(id, Some("  ")).is_ok());
        assert!(check_body_id(id, Some(&id.to_string())).is_ok());

        let other = Uuid::new_v4().to_string();
        assert!(matches!(
            check_body_id(id, Some(&other)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            check_body_id(id, Some("garbage")),
            Err(AppError::BadRequest(_))
        ));
    }
}
