//! Book model and related types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book title record from the catalog.
///
/// `available_copies` is the lendable-unit counter the inventory guard
/// mutates; `0 <= available_copies <= total_copies` must hold at every
/// observable point.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    /// Whether the title is listed in the public catalog.
    pub in_catalog: bool,
}

impl Book {
    /// A book is available when it is listed and a copy can be lent out.
    pub fn is_available(&self) -> bool {
        self.available_copies > 0 && self.in_catalog
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1))]
    pub isbn: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default = "default_total_copies")]
    pub total_copies: i32,
}

fn default_total_copies() -> i32 {
    1
}

/// Update book request (bibliographic fields only; copy counts move through
/// the lending workflow)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub author: Option<String>,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub in_catalog: Option<bool>,
}

/// Catalog search filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Substring match on title
    pub title: Option<String>,
    /// Substring match on author
    pub author: Option<String>,
    /// Exact genre match
    pub genre: Option<String>,
    /// Only books with a lendable copy
    #[serde(default)]
    pub available_only: bool,
}

/// Per-title inventory drift found by the reconciliation check: the number
/// of copies out on loan disagrees with the active-loan count.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct InventoryDrift {
    pub isbn: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub active_loans: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(available: i32, in_catalog: bool) -> Book {
        Book {
            isbn: "978-0132350884".into(),
            title: "Clean Code".into(),
            author: "Robert C. Martin".into(),
            publication_year: Some(2008),
            genre: Some("Programming".into()),
            price: None,
            description: None,
            total_copies: 5,
            available_copies: available,
            in_catalog,
        }
    }

    #[test]
    fn availability_needs_copies_and_listing() {
        assert!(book(1, true).is_available());
        assert!(!book(0, true).is_available());
        assert!(!book(1, false).is_available());
    }
}
