//! Book pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, FormRejection, WithRejection};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    forms::FormErrors,
    models::{BookForm, CATALOG_PREFIX},
    services::{Removal, Submission},
    views, AppState,
};

use super::{check_body_id, delete_body, parse_id};

#[derive(Debug, Default, Deserialize)]
pub struct DeleteBook {
    #[serde(default)]
    pub bookid: Option<String>,
}

fn list_url() -> String {
    format!("{}/books", CATALOG_PREFIX)
}

fn create_url() -> String {
    format!("{}/books/create", CATALOG_PREFIX)
}

/// List all books with their authors
pub async fn list_books(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.services.books.list().await?;
    Ok(Html(views::books::list(&books).into_string()))
}

/// Book detail with author, genres and copies
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id, "Book")?;
    let detail = state.services.books.detail(id).await?;
    Ok(Html(views::books::detail(&detail).into_string()))
}

pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let choices = state.services.books.choices().await?;
    let page = views::books::form(
        "Create Book",
        &create_url(),
        &BookForm::default(),
        &choices,
        &FormErrors::default(),
    );
    Ok(Html(page.into_string()))
}

pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<BookForm>, AppError>,
) -> AppResult<Response> {
    match state.services.books.create(form).await? {
        Submission::Saved(book) | Submission::Existing(book) => {
            Ok(Redirect::to(&book.url()).into_response())
        }
        Submission::Rejected { form, errors } => {
            let choices = state.services.books.choices().await?;
            let page = views::books::form("Create Book", &create_url(), &form, &choices, &errors);
            Ok(Html(page.into_string()).into_response())
        }
    }
}

pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id, "Book")?;
    let (form, choices) = state.services.books.edit_form(id).await?;
    let page = views::books::form(
        "Update Book",
        &format!("{}/books/{}/update", CATALOG_PREFIX, id),
        &form,
        &choices,
        &FormErrors::default(),
    );
    Ok(Html(page.into_string()))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): WithRejection<Form<BookForm>, AppError>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book")?;
    match state.services.books.update(id, form).await? {
        Submission::Saved(book) | Submission::Existing(book) => {
            Ok(Redirect::to(&book.url()).into_response())
        }
        Submission::Rejected { form, errors } => {
            let choices = state.services.books.choices().await?;
            let page = views::books::form(
                "Update Book",
                &format!("{}/books/{}/update", CATALOG_PREFIX, id),
                &form,
                &choices,
                &errors,
            );
            Ok(Html(page.into_string()).into_response())
        }
    }
}

/// Delete confirmation; an unknown book goes back to the list
pub async fn delete_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book")?;
    match state.services.books.delete_preview(id).await? {
        Some(preview) => Ok(Html(views::books::delete(&preview).into_string()).into_response()),
        None => Ok(Redirect::to(&list_url()).into_response()),
    }
}

/// Delete the book and its copies
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Form<DeleteBook>, FormRejection>,
) -> AppResult<Redirect> {
    let id = parse_id(&id, "Book")?;
    let body = delete_body(body)?;
    check_body_id(id, body.bookid.as_deref())?;

    if let Removal::Missing = state.services.books.delete(id).await? {
        tracing::debug!("Book {} was already gone", id);
    }
    Ok(Redirect::to(&list_url()))
}
