//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a book by ISBN
    pub async fn get_book(&self, isbn: &str) -> AppResult<Book> {
        self.repository.books.get_by_isbn(isbn).await
    }

    /// Add a new title
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        let created = self.repository.books.create(&book).await?;
        tracing::info!(isbn = %created.isbn, copies = created.total_copies, "book added to catalog");
        Ok(created)
    }

    /// Update bibliographic data
    pub async fn update_book(&self, isbn: &str, update: UpdateBook) -> AppResult<Book> {
        self.repository.books.update(isbn, &update).await
    }

    /// Remove a title from the catalog
    pub async fn delete_book(&self, isbn: &str) -> AppResult<()> {
        self.repository.books.delete(isbn).await
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }
}
