//! Genre pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, FormRejection, WithRejection};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    forms::FormErrors,
    models::{GenreForm, CATALOG_PREFIX},
    services::{Removal, Submission},
    views, AppState,
};

use super::{check_body_id, delete_body, parse_id};

#[derive(Debug, Default, Deserialize)]
pub struct DeleteGenre {
    #[serde(default)]
    pub genreid: Option<String>,
}

fn list_url() -> String {
    format!("{}/genres", CATALOG_PREFIX)
}

pub async fn list_genres(State(state): State<AppState>) -> AppResult<Html<String>> {
    let genres = state.services.genres.list().await?;
    Ok(Html(views::genres::list(&genres).into_string()))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id, "Genre")?;
    let detail = state.services.genres.detail(id).await?;
    Ok(Html(
        views::genres::detail(&detail.genre, &detail.books).into_string(),
    ))
}

pub async fn create_genre_form() -> Html<String> {
    let page = views::genres::form(
        "Create Genre",
        &format!("{}/genres/create", CATALOG_PREFIX),
        &GenreForm::default(),
        &FormErrors::default(),
    );
    Html(page.into_string())
}

/// Create a genre; a name that already exists redirects to the stored genre
pub async fn create_genre(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<GenreForm>, AppError>,
) -> AppResult<Response> {
    match state.services.genres.create(form).await? {
        Submission::Saved(genre) | Submission::Existing(genre) => {
            Ok(Redirect::to(&genre.url()).into_response())
        }
        Submission::Rejected { form, errors } => {
            let page = views::genres::form(
                "Create Genre",
                &format!("{}/genres/create", CATALOG_PREFIX),
                &form,
                &errors,
            );
            Ok(Html(page.into_string()).into_response())
        }
    }
}

pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id, "Genre")?;
    let genre = state.services.genres.get(id).await?;
    let page = views::genres::form(
        "Update Genre",
        &format!("{}/update", genre.url()),
        &GenreForm::from_genre(&genre),
        &FormErrors::default(),
    );
    Ok(Html(page.into_string()))
}

pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): WithRejection<Form<GenreForm>, AppError>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Genre")?;
    match state.services.genres.update(id, form).await? {
        Submission::Saved(genre) | Submission::Existing(genre) => {
            Ok(Redirect::to(&genre.url()).into_response())
        }
        Submission::Rejected { form, errors } => {
            let page = views::genres::form(
                "Update Genre",
                &format!("{}/genres/{}/update", CATALOG_PREFIX, id),
                &form,
                &errors,
            );
            Ok(Html(page.into_string()).into_response())
        }
    }
}

pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Genre")?;
    match state.services.genres.delete_preview(id).await? {
        Some(detail) => Ok(Html(
            views::genres::delete(&detail.genre, &detail.books).into_string(),
        )
        .into_response()),
        None => Ok(Redirect::to(&list_url()).into_response()),
    }
}

/// Delete the genre unless books are still filed under it
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Form<DeleteGenre>, FormRejection>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Genre")?;
    let body = delete_body(body)?;
    check_body_id(id, body.genreid.as_deref())?;

    match state.services.genres.delete(id).await? {
        Removal::Removed | Removal::Missing => Ok(Redirect::to(&list_url()).into_response()),
        Removal::Blocked(detail) => Ok(Html(
            views::genres::delete(&detail.genre, &detail.books).into_string(),
        )
        .into_response()),
    }
}
