//! Patrons repository: the membership directory

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::patron::{CreatePatron, Patron, UpdatePatron},
};

#[derive(Clone)]
pub struct PatronsRepository {
    pool: Pool<Postgres>,
}

impl PatronsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get patron by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Patron> {
        sqlx::query_as::<_, Patron>("SELECT * FROM patrons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::PatronNotFound(id))
    }

    /// List all patrons
    pub async fn list(&self) -> AppResult<Vec<Patron>> {
        let patrons = sqlx::query_as::<_, Patron>("SELECT * FROM patrons ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(patrons)
    }

    /// Register a new patron
    pub async fn create(&self, patron: &CreatePatron) -> AppResult<Patron> {
        sqlx::query_as::<_, Patron>(
            r#"
            INSERT INTO patrons (name, email, phone, role, membership_tier, active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING *
            "#,
        )
        .bind(&patron.name)
        .bind(&patron.email)
        .bind(&patron.phone)
        .bind(patron.role as i16)
        .bind(patron.membership_tier as i16)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Email {} is already registered", patron.email))
            }
            _ => AppError::from(e),
        })
    }

    /// Update patron information
    pub async fn update(&self, id: i32, update: &UpdatePatron) -> AppResult<Patron> {
        sqlx::query_as::<_, Patron>(
            r#"
            UPDATE patrons
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                role = COALESCE($5, role),
                membership_tier = COALESCE($6, membership_tier),
                active = COALESCE($7, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(update.role.map(i16::from))
        .bind(update.membership_tier.map(i16::from))
        .bind(update.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::PatronNotFound(id))
    }

    /// Delete a patron. Refused while the patron has books out.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let has_active: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE patron_id = $1 AND status = 0)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if has_active {
            return Err(AppError::Conflict(format!(
                "Cannot delete patron {}: patron has active loans",
                id
            )));
        }

        let result = sqlx::query("DELETE FROM patrons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::Conflict(format!("Cannot delete patron {}: patron has loan history", id))
                }
                _ => AppError::from(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::PatronNotFound(id));
        }
        Ok(())
    }
}
