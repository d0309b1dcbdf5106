//! Book queries on Repository

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{Book, BookData},
};

/// Columns of a book row, with its genre ids in submitted order
const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.summary, b.isbn, b.author_id,
    ARRAY(
        SELECT bg.genre_id FROM book_genres bg
        WHERE bg.book_id = b.id
        ORDER BY bg.position
    ) AS genre_ids
"#;

/// Replace the genre links of a book inside a transaction
async fn set_book_genres(
    tx: &mut Transaction<'_, Postgres>,
    book_id: Uuid,
    genre_ids: &[Uuid],
) -> AppResult<()> {
    sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
        .bind(book_id)
        .execute(&mut **tx)
        .await?;

    if !genre_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO book_genres (book_id, genre_id, position)
            SELECT $1, g.genre_id, g.position
            FROM UNNEST($2::uuid[]) WITH ORDINALITY AS g(genre_id, position)
            "#,
        )
        .bind(book_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

impl Repository {
    pub(crate) async fn books_list_sorted(&self) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books b ORDER BY b.title", BOOK_COLUMNS);
        let rows = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub(crate) async fn books_get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books b WHERE b.id = $1", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub(crate) async fn books_find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books b WHERE b.author_id = $1 ORDER BY b.title",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub(crate) async fn books_find_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let query = format!(
            r#"
            SELECT {} FROM books b
            WHERE EXISTS (
                SELECT 1 FROM book_genres bg WHERE bg.book_id = b.id AND bg.genre_id = $1
            )
            ORDER BY b.title
            "#,
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(genre_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub(crate) async fn books_insert(&self, data: &BookData) -> AppResult<Book> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO books (id, title, summary, isbn, author_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.author_id)
        .execute(&mut *tx)
        .await?;

        set_book_genres(&mut tx, id, &data.genre_ids).await?;
        tx.commit().await?;

        Ok(Book {
            id,
            title: data.title.clone(),
            summary: data.summary.clone(),
            isbn: data.isbn.clone(),
            author_id: data.author_id,
            genre_ids: data.genre_ids.clone(),
        })
    }

    pub(crate) async fn books_update_by_id(
        &self,
        id: Uuid,
        data: &BookData,
    ) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, summary = $3, isbn = $4, author_id = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.author_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        set_book_genres(&mut tx, id, &data.genre_ids).await?;
        tx.commit().await?;

        Ok(Some(Book {
            id,
            title: data.title.clone(),
            summary: data.summary.clone(),
            isbn: data.isbn.clone(),
            author_id: data.author_id,
            genre_ids: data.genre_ids.clone(),
        }))
    }

    pub(crate) async fn books_delete_with_instances(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM book_instances WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if result.rows_affected() > 0 {
            tracing::debug!("Deleted book {} with {} instance(s)", id, removed);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) async fn books_count_all(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
