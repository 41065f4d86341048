//! Lending workflow endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::InventoryDrift,
        loan::{Fine, Loan, OverdueLoan},
    },
    AppState,
};

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Patron ID
    pub patron_id: i32,
    /// Book ISBN
    pub isbn: String,
}

/// Borrow response with the computed due date
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Due date (ISO 8601 format)
    pub due_at: DateTime<Utc>,
    /// Status message
    pub message: String,
}

/// Return request
#[derive(Deserialize, ToSchema)]
pub struct ReturnRequest {
    /// Patron ID
    pub patron_id: i32,
    /// Book ISBN
    pub isbn: String,
    /// Return timestamp; defaults to now. Mainly for back-dated desk
    /// returns and tests.
    pub returned_at: Option<DateTime<Utc>>,
}

/// Return response with the accrued fine
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Fine accrued (0 when returned on time)
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
    /// Status message
    pub message: String,
}

/// Outstanding fine for one loan
#[derive(Serialize, ToSchema)]
pub struct OutstandingFineResponse {
    pub loan_id: i64,
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/loans/borrow",
    tag = "lending",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Loan opened", body = BorrowResponse),
        (status = 404, description = "Patron or book not found"),
        (status = 422, description = "Patron inactive, limit reached, or no copies available")
    )
)]
pub async fn borrow(
    State(state): State<AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let due_at = state
        .services
        .lending
        .borrow(request.patron_id, &request.isbn, Utc::now())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            due_at,
            message: format!("Book borrowed successfully. Due date: {}", due_at.date_naive()),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/return",
    tag = "lending",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Loan closed", body = ReturnResponse),
        (status = 422, description = "No active loan for this patron and book")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let returned_at = request.returned_at.unwrap_or_else(Utc::now);
    let fine_amount = state
        .services
        .lending
        .return_book(request.patron_id, &request.isbn, returned_at)
        .await?;

    let message = if fine_amount > Decimal::ZERO {
        format!("Book returned. Overdue fine: {}", fine_amount)
    } else {
        "Book returned on time".to_string()
    };

    Ok(Json(ReturnResponse {
        fine_amount,
        message,
    }))
}

/// List active loans past their due date
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "lending",
    responses(
        (status = 200, description = "Overdue loans", body = Vec<OverdueLoan>)
    )
)]
pub async fn overdue_report(State(state): State<AppState>) -> AppResult<Json<Vec<OverdueLoan>>> {
    let report = state.services.lending.overdue_report(Utc::now()).await?;
    Ok(Json(report))
}

/// Fine currently attached to a loan
#[utoipa::path(
    get,
    path = "/loans/{id}/fine",
    tag = "lending",
    params(
        ("id" = i64, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Outstanding fine", body = OutstandingFineResponse),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn outstanding_fine(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
) -> AppResult<Json<OutstandingFineResponse>> {
    let amount = state
        .services
        .lending
        .outstanding_fine(loan_id, Utc::now())
        .await?;
    Ok(Json(OutstandingFineResponse { loan_id, amount }))
}

/// Loan history for a patron
#[utoipa::path(
    get,
    path = "/patrons/{id}/loans",
    tag = "lending",
    params(
        ("id" = i32, Path, description = "Patron ID")
    ),
    responses(
        (status = 200, description = "Patron's loans, newest first", body = Vec<Loan>),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn patron_loans(
    State(state): State<AppState>,
    Path(patron_id): Path<i32>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.lending.loan_history(patron_id).await?;
    Ok(Json(loans))
}

/// Fine records for a patron
#[utoipa::path(
    get,
    path = "/patrons/{id}/fines",
    tag = "lending",
    params(
        ("id" = i32, Path, description = "Patron ID")
    ),
    responses(
        (status = 200, description = "Patron's fines, newest first", body = Vec<Fine>),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn patron_fines(
    State(state): State<AppState>,
    Path(patron_id): Path<i32>,
) -> AppResult<Json<Vec<Fine>>> {
    let fines = state.services.lending.patron_fines(patron_id).await?;
    Ok(Json(fines))
}

/// Inventory/ledger consistency check
#[utoipa::path(
    get,
    path = "/lending/reconciliation",
    tag = "lending",
    responses(
        (status = 200, description = "Titles with inventory drift; empty when consistent", body = Vec<InventoryDrift>)
    )
)]
pub async fn reconciliation(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryDrift>>> {
    let drift = state.services.lending.reconciliation_report().await?;
    Ok(Json(drift))
}
