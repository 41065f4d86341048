//! Domain models

pub mod book;
pub mod enums;
pub mod loan;
pub mod patron;

pub use book::{Book, BookQuery, CreateBook, InventoryDrift, UpdateBook};
pub use enums::{FineStatus, LoanStatus, MembershipTier, PatronRole};
pub use loan::{Fine, Loan, OverdueLoan};
pub use patron::{CreatePatron, Patron, UpdatePatron};
