//! Loans repository: the loan ledger and fine records
//!
//! The ledger owns the loan state machine. A loan is inserted Active and
//! moved to Completed exactly once; rows are never deleted. The ledger is
//! also the final authority on the one-active-loan-per-pair invariant: the
//! conditional insert (backed by a partial unique index) rejects
//! duplicates even when the caller's eligibility check raced.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    fines,
    models::{
        book::InventoryDrift,
        loan::{Fine, Loan, OverdueLoan},
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::LoanNotFound(id))
    }

    /// Open a loan for a (patron, book) pair.
    ///
    /// The insert only fires when no active loan exists for the pair, so a
    /// stale eligibility check upstream cannot create a duplicate.
    pub async fn open_loan(
        &self,
        patron_id: i32,
        isbn: &str,
        opened_at: DateTime<Utc>,
        due_at: DateTime<Utc>,
    ) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (patron_id, isbn, opened_at, due_at, status, fine_amount, fine_paid)
            SELECT $1, $2, $3, $4, 0, 0, FALSE
            WHERE NOT EXISTS (
                SELECT 1 FROM loans WHERE patron_id = $1 AND isbn = $2 AND status = 0
            )
            RETURNING *
            "#,
        )
        .bind(patron_id)
        .bind(isbn)
        .bind(opened_at)
        .bind(due_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            // Two concurrent opens can both pass the NOT EXISTS; the
            // partial unique index turns the loser into this error.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::DuplicateActiveLoan {
                    patron_id,
                    isbn: isbn.to_string(),
                }
            }
            _ => AppError::from(e),
        })?;

        loan.ok_or(AppError::DuplicateActiveLoan {
            patron_id,
            isbn: isbn.to_string(),
        })
    }

    /// Find the active loan for a (patron, book) pair, if any.
    pub async fn find_active(&self, patron_id: i32, isbn: &str) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE patron_id = $1 AND isbn = $2 AND status = 0",
        )
        .bind(patron_id)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Close a loan, recording the return time and any fine.
    ///
    /// The status flip and the fine record are one database transaction so
    /// a completed-overdue loan never lacks its fine row.
    pub async fn close_loan(
        &self,
        loan_id: i64,
        closed_at: DateTime<Utc>,
        fine_amount: Decimal,
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET closed_at = $2, status = 1, fine_amount = $3
            WHERE id = $1 AND status = 0
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(closed_at)
        .bind(fine_amount)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(loan) = updated else {
            // Distinguish a missing loan from an immutable completed one.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE id = $1)")
                    .bind(loan_id)
                    .fetch_one(&mut *tx)
                    .await?;
            return Err(if exists {
                AppError::LoanAlreadyClosed(loan_id)
            } else {
                AppError::LoanNotFound(loan_id)
            });
        };

        if fine_amount > Decimal::ZERO {
            sqlx::query(
                r#"
                INSERT INTO fines (loan_id, patron_id, amount, issued_on, status)
                VALUES ($1, $2, $3, $4, 0)
                "#,
            )
            .bind(loan.id)
            .bind(loan.patron_id)
            .bind(fine_amount)
            .bind(closed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(loan)
    }

    /// Count active loans for a patron
    pub async fn count_active(&self, patron_id: i32) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE patron_id = $1 AND status = 0")
                .bind(patron_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Active loans past their due date as of `now`, oldest first.
    pub async fn overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueLoan>> {
        let rows = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE status = 0 AND due_at < $1 ORDER BY due_at, id",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|loan| OverdueLoan {
                patron_id: loan.patron_id,
                isbn: loan.isbn,
                due_at: loan.due_at,
                days_overdue: fines::days_overdue(loan.due_at, now),
            })
            .collect())
    }

    /// Full loan history for a patron, newest first.
    pub async fn history(&self, patron_id: i32) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE patron_id = $1 ORDER BY opened_at DESC, id DESC",
        )
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Fine records for a patron, newest first.
    pub async fn fines_for_patron(&self, patron_id: i32) -> AppResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            "SELECT * FROM fines WHERE patron_id = $1 ORDER BY issued_on DESC, id DESC",
        )
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fines)
    }

    /// Titles whose copies-on-loan count disagrees with the active-loan
    /// count. Read-only and idempotent; an empty result means the
    /// inventory and the ledger agree.
    pub async fn inventory_drift(&self) -> AppResult<Vec<InventoryDrift>> {
        let drift = sqlx::query_as::<_, InventoryDrift>(
            r#"
            SELECT b.isbn, b.total_copies, b.available_copies,
                   COUNT(l.id) AS active_loans
            FROM books b
            LEFT JOIN loans l ON l.isbn = b.isbn AND l.status = 0
            GROUP BY b.isbn, b.total_copies, b.available_copies
            HAVING (b.total_copies - b.available_copies)::bigint <> COUNT(l.id)
            ORDER BY b.isbn
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(drift)
    }
}
