//! Genre queries on Repository

use uuid::Uuid;

use super::{Deletion, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{Genre, GenreData},
};

/// Map a unique violation on the case-insensitive name index to a conflict
fn name_conflict(err: sqlx::Error, name: &str) -> AppError {
    let err = AppError::from(err);
    if err.is_unique_violation() {
        AppError::Conflict(format!("Genre {} already exists", name))
    } else {
        err
    }
}

impl Repository {
    pub(crate) async fn genres_list_sorted(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub(crate) async fn genres_get_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub(crate) async fn genres_get_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub(crate) async fn genres_find_by_name_ci(&self, name: &str) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub(crate) async fn genres_insert(&self, data: &GenreData) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("INSERT INTO genres (id, name) VALUES ($1, $2) RETURNING id, name")
            .bind(Uuid::new_v4())
            .bind(&data.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| name_conflict(e, &data.name))
    }

    pub(crate) async fn genres_update_by_id(
        &self,
        id: Uuid,
        data: &GenreData,
    ) -> AppResult<Option<Genre>> {
        sqlx::query_as::<_, Genre>("UPDATE genres SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(&data.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| name_conflict(e, &data.name))
    }

    pub(crate) async fn genres_delete_if_unreferenced(&self, id: Uuid) -> AppResult<Deletion> {
        let result = sqlx::query(
            r#"
            DELETE FROM genres g
            WHERE g.id = $1
              AND NOT EXISTS (SELECT 1 FROM book_genres bg WHERE bg.genre_id = g.id)
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(Deletion::Deleted);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM genres WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(if exists { Deletion::Referenced } else { Deletion::Missing })
    }

    pub(crate) async fn genres_count_all(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
