//! Books repository: catalog rows and the copy-availability counter

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ISBN
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::BookNotFound(isbn.to_string()))
    }

    /// Add a new title to the catalog; all copies start available.
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, title, author, publication_year, genre,
                               price, description, total_copies, available_copies, in_catalog)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, TRUE)
            RETURNING *
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.publication_year)
        .bind(&book.genre)
        .bind(book.price)
        .bind(&book.description)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Book {} already exists", book.isbn))
            }
            _ => AppError::from(e),
        })
    }

    /// Update bibliographic fields. Copy counts only move through the
    /// lending workflow.
    pub async fn update(&self, isbn: &str, update: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                publication_year = COALESCE($4, publication_year),
                genre = COALESCE($5, genre),
                price = COALESCE($6, price),
                description = COALESCE($7, description),
                in_catalog = COALESCE($8, in_catalog)
            WHERE isbn = $1
            RETURNING *
            "#,
        )
        .bind(isbn)
        .bind(&update.title)
        .bind(&update.author)
        .bind(update.publication_year)
        .bind(&update.genre)
        .bind(update.price)
        .bind(&update.description)
        .bind(update.in_catalog)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BookNotFound(isbn.to_string()))
    }

    /// Delete a title. Refused while copies are out on loan, and loan
    /// history keeps a foreign key on the isbn.
    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        let borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE isbn = $1 AND status = 0)",
        )
        .bind(isbn)
        .fetch_one(&self.pool)
        .await?;

        if borrowed {
            return Err(AppError::Conflict(format!(
                "Cannot delete {}: book is currently borrowed",
                isbn
            )));
        }

        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::Conflict(format!("Cannot delete {}: book has loan history", isbn))
                }
                _ => AppError::from(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::BookNotFound(isbn.to_string()));
        }
        Ok(())
    }

    /// Search books with filters
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR author ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR genre = $3)
              AND (NOT $4 OR (available_copies > 0 AND in_catalog))
            ORDER BY title
            "#,
        )
        .bind(&query.title)
        .bind(&query.author)
        .bind(&query.genre)
        .bind(query.available_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Check-and-decrement of the availability counter as one conditional
    /// update; this statement is the serialization point for concurrent
    /// borrows of the same title. Returns false when no copies remain.
    pub async fn acquire_copy(&self, isbn: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 \
             WHERE isbn = $1 AND available_copies > 0",
        )
        .bind(isbn)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Conditional increment of the availability counter, clamped at
    /// `total_copies`. Returns false when the clamp (or a missing row)
    /// prevented the increment.
    pub async fn release_copy(&self, isbn: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET available_copies = available_copies + 1 \
             WHERE isbn = $1 AND available_copies < total_copies",
        )
        .bind(isbn)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
