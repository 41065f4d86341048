//! Inventory guard: copy-availability enforcement
//!
//! All mutation of `available_copies` goes through this guard. Both
//! operations delegate to single conditional updates in the books
//! repository, so concurrent borrow/return calls on the same title
//! serialize on the store and the counter can never be observed outside
//! `[0, total_copies]`.

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

#[derive(Clone)]
pub struct InventoryGuard {
    repository: Repository,
}

impl InventoryGuard {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Claim one lendable copy. `Ok(false)` means no copies remain right
    /// now; that is an answer, not a failure. When exactly one copy is
    /// left, at most one of any number of concurrent claims succeeds.
    pub async fn try_acquire_copy(&self, isbn: &str) -> AppResult<bool> {
        self.repository.books.acquire_copy(isbn).await
    }

    /// Hand one copy back. An increment the clamp refuses means a copy was
    /// returned that was never lent out (or the title vanished) - a bug in
    /// the lending flow, not a user error.
    pub async fn release_copy(&self, isbn: &str) -> AppResult<()> {
        if self.repository.books.release_copy(isbn).await? {
            Ok(())
        } else {
            let detail = format!(
                "release of a copy of {} would exceed total_copies or the book no longer exists",
                isbn
            );
            tracing::error!("Invariant violation: {}", detail);
            Err(AppError::InvariantViolation(detail))
        }
    }
}
