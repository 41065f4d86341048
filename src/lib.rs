//! Stacks Library Lending System
//!
//! A Rust server for a library's catalog, membership, and lending
//! workflow. The core is the lending subsystem: borrow/return lifecycle,
//! the per-book copy-availability ledger, borrowing-limit enforcement,
//! and overdue-fine accrual.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod fines;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
