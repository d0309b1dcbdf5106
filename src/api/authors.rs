//! Author pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, FormRejection, WithRejection};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    forms::FormErrors,
    models::{AuthorForm, CATALOG_PREFIX},
    services::{Removal, Submission},
    views, AppState,
};

use super::{check_body_id, delete_body, parse_id};

/// Hidden field posted by the delete confirmation page
#[derive(Debug, Default, Deserialize)]
pub struct DeleteAuthor {
    #[serde(default)]
    pub authorid: Option<String>,
}

fn list_url() -> String {
    format!("{}/authors", CATALOG_PREFIX)
}

/// List all authors
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Html<String>> {
    let authors = state.services.authors.list().await?;
    Ok(Html(views::authors::list(&authors).into_string()))
}

/// Author detail with their books
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id, "Author")?;
    let detail = state.services.authors.detail(id).await?;
    Ok(Html(
        views::authors::detail(&detail.author, &detail.books).into_string(),
    ))
}

pub async fn create_author_form() -> Html<String> {
    let page = views::authors::form(
        "Create Author",
        &format!("{}/authors/create", CATALOG_PREFIX),
        &AuthorForm::default(),
        &FormErrors::default(),
    );
    Html(page.into_string())
}

pub async fn create_author(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<AuthorForm>, AppError>,
) -> AppResult<Response> {
    match state.services.authors.create(form).await? {
        Submission::Saved(author) | Submission::Existing(author) => {
            Ok(Redirect::to(&author.url()).into_response())
        }
        Submission::Rejected { form, errors } => {
            let page = views::authors::form(
                "Create Author",
                &format!("{}/authors/create", CATALOG_PREFIX),
                &form,
                &errors,
            );
            Ok(Html(page.into_string()).into_response())
        }
    }
}

pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id, "Author")?;
    let author = state.services.authors.get(id).await?;
    let page = views::authors::form(
        "Update Author",
        &format!("{}/update", author.url()),
        &AuthorForm::from_author(&author),
        &FormErrors::default(),
    );
    Ok(Html(page.into_string()))
}

pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): WithRejection<Form<AuthorForm>, AppError>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Author")?;
    match state.services.authors.update(id, form).await? {
        Submission::Saved(author) | Submission::Existing(author) => {
            Ok(Redirect::to(&author.url()).into_response())
        }
        Submission::Rejected { form, errors } => {
            let page = views::authors::form(
                "Update Author",
                &format!("{}/authors/{}/update", CATALOG_PREFIX, id),
                &form,
                &errors,
            );
            Ok(Html(page.into_string()).into_response())
        }
    }
}

/// Delete confirmation; an unknown author goes back to the list
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Author")?;
    match state.services.authors.delete_preview(id).await? {
        Some(detail) => Ok(Html(
            views::authors::delete(&detail.author, &detail.books).into_string(),
        )
        .into_response()),
        None => Ok(Redirect::to(&list_url()).into_response()),
    }
}

pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Form<DeleteAuthor>, FormRejection>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Author")?;
    let body = delete_body(body)?;
    check_body_id(id, body.authorid.as_deref())?;

    match state.services.authors.delete(id).await? {
        Removal::Removed | Removal::Missing => Ok(Redirect::to(&list_url()).into_response()),
        Removal::Blocked(detail) => Ok(Html(
            views::authors::delete(&detail.author, &detail.books).into_string(),
        )
        .into_response()),
    }
}
