//! Lending service: the borrow/return workflow
//!
//! Orchestrates eligibility checks, the inventory guard, and the loan
//! ledger. Every operation takes its timestamp from the caller so due
//! dates and fines are deterministic under test.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    fines,
    models::loan::{Fine, Loan, OverdueLoan},
    models::book::InventoryDrift,
    repository::Repository,
    services::inventory::InventoryGuard,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    guard: InventoryGuard,
    config: LendingConfig,
}

impl LendingService {
    pub fn new(repository: Repository, guard: InventoryGuard, config: LendingConfig) -> Self {
        Self {
            repository,
            guard,
            config,
        }
    }

    fn daily_rate(&self) -> Decimal {
        Decimal::from(self.config.daily_fine_rate)
    }

    /// Borrow a book for a patron. Returns the due date.
    ///
    /// The limit check and the copy acquisition are separate store round
    /// trips; the ledger's duplicate check is the final authority if the
    /// count goes stale in between.
    pub async fn borrow(
        &self,
        patron_id: i32,
        isbn: &str,
        now: DateTime<Utc>,
    ) -> AppResult<DateTime<Utc>> {
        let patron = self.repository.patrons.get_by_id(patron_id).await?;
        if !patron.active {
            return Err(AppError::PatronInactive(patron_id));
        }

        // Existence is checked independently of the availability race below.
        self.repository.books.get_by_isbn(isbn).await?;

        let active = self.repository.loans.count_active(patron_id).await?;
        let max = patron.membership_tier.max_concurrent_loans();
        if active >= max {
            return Err(AppError::BorrowLimitExceeded {
                current: active,
                max,
            });
        }

        if !self.guard.try_acquire_copy(isbn).await? {
            return Err(AppError::BookUnavailable(isbn.to_string()));
        }

        let due_at = now + Duration::days(self.config.loan_period_days);
        let loan = match self.repository.loans.open_loan(patron_id, isbn, now, due_at).await {
            Ok(loan) => loan,
            Err(err) => {
                // The copy is already decremented; hand it back rather than
                // strand inventory. If that fails too, escalate instead of
                // leaving the drift silent.
                if let Err(release_err) = self.guard.release_copy(isbn).await {
                    tracing::error!(
                        isbn,
                        patron_id,
                        error = %release_err,
                        "failed to release copy after loan creation failure"
                    );
                    return Err(AppError::ReconciliationRequired(format!(
                        "copy of {} acquired without an open loan: {}",
                        isbn, err
                    )));
                }
                return Err(err);
            }
        };

        tracing::info!(loan_id = loan.id, patron_id, isbn, %due_at, "loan opened");
        Ok(due_at)
    }

    /// Return a borrowed book. Returns the fine accrued (zero if on time).
    pub async fn return_book(
        &self,
        patron_id: i32,
        isbn: &str,
        returned_at: DateTime<Utc>,
    ) -> AppResult<Decimal> {
        let loan = self
            .repository
            .loans
            .find_active(patron_id, isbn)
            .await?
            .ok_or_else(|| AppError::NoActiveLoan {
                patron_id,
                isbn: isbn.to_string(),
            })?;

        let fine = fines::accrued(loan.due_at, returned_at, self.daily_rate());
        let closed = self
            .repository
            .loans
            .close_loan(loan.id, returned_at, fine)
            .await?;

        // The loan is closed; a failed release here leaves the counter one
        // short until reconciliation, so it escalates rather than returns
        // success.
        if let Err(release_err) = self.guard.release_copy(isbn).await {
            tracing::error!(
                loan_id = closed.id,
                isbn,
                error = %release_err,
                "failed to release copy after closing loan"
            );
            return Err(AppError::ReconciliationRequired(format!(
                "loan {} closed but copy of {} not released: {}",
                closed.id, isbn, release_err
            )));
        }

        tracing::info!(loan_id = closed.id, patron_id, isbn, %fine, "loan closed");
        Ok(fine)
    }

    /// Active loans past their due date as of `now`. Read-only; safe to
    /// run concurrently with everything else.
    pub async fn overdue_report(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueLoan>> {
        self.repository.loans.overdue(now).await
    }

    /// Fine currently attached to a loan: the recorded amount for a
    /// completed loan, the accrual as of `now` for one still open.
    pub async fn outstanding_fine(&self, loan_id: i64, now: DateTime<Utc>) -> AppResult<Decimal> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;
        if loan.is_active() {
            Ok(fines::accrued_as_of(loan.due_at, now, self.daily_rate()))
        } else {
            Ok(loan.fine_amount)
        }
    }

    /// Full loan history for a patron
    pub async fn loan_history(&self, patron_id: i32) -> AppResult<Vec<Loan>> {
        // Verify patron exists
        self.repository.patrons.get_by_id(patron_id).await?;
        self.repository.loans.history(patron_id).await
    }

    /// Fine records for a patron
    pub async fn patron_fines(&self, patron_id: i32) -> AppResult<Vec<Fine>> {
        self.repository.patrons.get_by_id(patron_id).await?;
        self.repository.loans.fines_for_patron(patron_id).await
    }

    /// Consistency check between the inventory counters and the loan
    /// ledger. Idempotent; intended to run after a ReconciliationRequired
    /// escalation or on a schedule.
    pub async fn reconciliation_report(&self) -> AppResult<Vec<InventoryDrift>> {
        self.repository.loans.inventory_drift().await
    }
}
