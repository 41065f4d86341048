//! Business logic services

pub mod catalog;
pub mod directory;
pub mod inventory;
pub mod lending;

use crate::{config::LendingConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub directory: directory::DirectoryService,
    pub lending: lending::LendingService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, lending_config: LendingConfig) -> Self {
        let guard = inventory::InventoryGuard::new(repository.clone());
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            directory: directory::DirectoryService::new(repository.clone()),
            lending: lending::LendingService::new(repository.clone(), guard, lending_config),
            repository,
        }
    }

    /// Database pool, for connectivity probes.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.repository.pool
    }
}
