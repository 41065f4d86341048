//! Loan and fine models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::{FineStatus, LoanStatus};

/// One borrow-to-return lifecycle for a (patron, book) pair.
///
/// Rows are append-only history: a loan is created Active and closed
/// exactly once, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub patron_id: i32,
    pub isbn: String,
    pub opened_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
    pub fine_paid: bool,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }
}

/// Fine record emitted when a loan closes past its due date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub id: i64,
    pub loan_id: i64,
    pub patron_id: i32,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub issued_on: DateTime<Utc>,
    pub status: FineStatus,
}

/// One row of the overdue report: an active loan past its due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OverdueLoan {
    pub patron_id: i32,
    pub isbn: String,
    pub due_at: DateTime<Utc>,
    pub days_overdue: i64,
}
