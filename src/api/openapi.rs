//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, lending, patrons};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stacks API",
        version = "0.3.0",
        description = "Library Lending System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::search_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Patrons
        patrons::list_patrons,
        patrons::get_patron,
        patrons::create_patron,
        patrons::update_patron,
        patrons::delete_patron,
        // Lending
        lending::borrow,
        lending::return_book,
        lending::overdue_report,
        lending::outstanding_fine,
        lending::patron_loans,
        lending::patron_fines,
        lending::reconciliation,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::InventoryDrift,
            // Patrons
            crate::models::patron::Patron,
            crate::models::patron::CreatePatron,
            crate::models::patron::UpdatePatron,
            crate::models::enums::MembershipTier,
            crate::models::enums::PatronRole,
            // Lending
            crate::models::loan::Loan,
            crate::models::loan::Fine,
            crate::models::loan::OverdueLoan,
            crate::models::enums::LoanStatus,
            crate::models::enums::FineStatus,
            lending::BorrowRequest,
            lending::BorrowResponse,
            lending::ReturnRequest,
            lending::ReturnResponse,
            lending::OutstandingFineResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "patrons", description = "Patron directory"),
        (name = "lending", description = "Borrow/return workflow")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
