//! Patron directory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::patron::{CreatePatron, Patron, UpdatePatron},
    AppState,
};

/// List all patrons
#[utoipa::path(
    get,
    path = "/patrons",
    tag = "patrons",
    responses(
        (status = 200, description = "All patrons", body = Vec<Patron>)
    )
)]
pub async fn list_patrons(State(state): State<AppState>) -> AppResult<Json<Vec<Patron>>> {
    let patrons = state.services.directory.list_patrons().await?;
    Ok(Json(patrons))
}

/// Get a patron by ID
#[utoipa::path(
    get,
    path = "/patrons/{id}",
    tag = "patrons",
    params(
        ("id" = i32, Path, description = "Patron ID")
    ),
    responses(
        (status = 200, description = "The patron", body = Patron),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn get_patron(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Patron>> {
    let patron = state.services.directory.get_patron(id).await?;
    Ok(Json(patron))
}

/// Register a new patron
#[utoipa::path(
    post,
    path = "/patrons",
    tag = "patrons",
    request_body = CreatePatron,
    responses(
        (status = 201, description = "Patron created", body = Patron),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_patron(
    State(state): State<AppState>,
    Json(payload): Json<CreatePatron>,
) -> AppResult<(StatusCode, Json<Patron>)> {
    payload.validate()?;
    let patron = state.services.directory.create_patron(payload).await?;
    Ok((StatusCode::CREATED, Json(patron)))
}

/// Update a patron
#[utoipa::path(
    put,
    path = "/patrons/{id}",
    tag = "patrons",
    params(
        ("id" = i32, Path, description = "Patron ID")
    ),
    request_body = UpdatePatron,
    responses(
        (status = 200, description = "Updated patron", body = Patron),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn update_patron(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePatron>,
) -> AppResult<Json<Patron>> {
    payload.validate()?;
    let patron = state.services.directory.update_patron(id, payload).await?;
    Ok(Json(patron))
}

/// Delete a patron
#[utoipa::path(
    delete,
    path = "/patrons/{id}",
    tag = "patrons",
    params(
        ("id" = i32, Path, description = "Patron ID")
    ),
    responses(
        (status = 204, description = "Patron deleted"),
        (status = 404, description = "Patron not found"),
        (status = 409, description = "Patron has active loans or loan history")
    )
)]
pub async fn delete_patron(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.directory.delete_patron(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
