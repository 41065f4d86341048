//! Patron directory service
//!
//! Stands in for the identity side of membership: the lending core only
//! ever asks it who a patron is and whether they are active. Credentials
//! and authorization live outside this server.

use crate::{
    error::AppResult,
    models::patron::{CreatePatron, Patron, UpdatePatron},
    repository::Repository,
};

#[derive(Clone)]
pub struct DirectoryService {
    repository: Repository,
}

impl DirectoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a patron by ID
    pub async fn get_patron(&self, id: i32) -> AppResult<Patron> {
        self.repository.patrons.get_by_id(id).await
    }

    /// List all patrons
    pub async fn list_patrons(&self) -> AppResult<Vec<Patron>> {
        self.repository.patrons.list().await
    }

    /// Register a new patron
    pub async fn create_patron(&self, patron: CreatePatron) -> AppResult<Patron> {
        let created = self.repository.patrons.create(&patron).await?;
        tracing::info!(patron_id = created.id, tier = %created.membership_tier, "patron registered");
        Ok(created)
    }

    /// Update a patron
    pub async fn update_patron(&self, id: i32, update: UpdatePatron) -> AppResult<Patron> {
        self.repository.patrons.update(id, &update).await
    }

    /// Remove a patron
    pub async fn delete_patron(&self, id: i32) -> AppResult<()> {
        self.repository.patrons.delete(id).await
    }
}
