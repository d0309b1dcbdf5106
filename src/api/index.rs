//! Catalog home page

use axum::{extract::State, response::Html};

use crate::{error::AppResult, views, AppState};

/// Dashboard with record counts
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let counts = state.services.stats.counts().await?;
    Ok(Html(views::index::page(&counts).into_string()))
}
