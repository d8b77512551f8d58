//! Supplier route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};

use stockroom_core::SupplierId;

use crate::db::{SummaryRepository, SupplierRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{Supplier, SupplierPayload, SupplierSummary};
use crate::state::AppState;

/// Build the supplier router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers/", get(list).post(create))
        .route("/suppliers/summary/", get(summary))
        .route(
            "/suppliers/{id}/",
            get(show).put(replace).patch(update).delete(destroy),
        )
}

/// GET /suppliers/
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Supplier>>, AppError> {
    let suppliers = SupplierRepository::new(state.pool()).list().await?;
    Ok(Json(suppliers))
}

/// GET /suppliers/{id}/
async fn show(
    State(state): State<AppState>,
    path: Result<Path<SupplierId>, PathRejection>,
) -> Result<Json<Supplier>, AppError> {
    let Path(id) = path?;
    let supplier = SupplierRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("supplier", id))?;
    Ok(Json(supplier))
}

/// POST /suppliers/
async fn create(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Supplier>), AppError> {
    let Json(payload) = payload?;
    let input = payload.validate()?;

    let supplier = SupplierRepository::new(state.pool())
        .create(&input, account.id)
        .await?;

    tracing::info!(
        supplier_id = %supplier.id,
        created_by = %account.username,
        "Supplier created"
    );
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// PUT /suppliers/{id}/
///
/// Omitted contact fields keep their stored values.
async fn replace(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<SupplierId>, PathRejection>,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> Result<Json<Supplier>, AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let repo = SupplierRepository::new(state.pool());

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("supplier", id))?;
    let input = payload.over_optional(&existing).validate()?;

    let supplier = repo
        .update(id, &input)
        .await
        .map_err(|e| AppError::from_repository(e, "supplier", id))?;
    Ok(Json(supplier))
}

/// PATCH /suppliers/{id}/
async fn update(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<SupplierId>, PathRejection>,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> Result<Json<Supplier>, AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let repo = SupplierRepository::new(state.pool());

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("supplier", id))?;
    let input = payload.over(&existing).validate()?;

    let supplier = repo
        .update(id, &input)
        .await
        .map_err(|e| AppError::from_repository(e, "supplier", id))?;
    Ok(Json(supplier))
}

/// DELETE /suppliers/{id}/
///
/// Items from the supplier are removed by the foreign key cascade.
async fn destroy(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<SupplierId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let removed_items = SupplierRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| AppError::from_repository(e, "supplier", id))?;

    tracing::info!(
        supplier_id = %id,
        removed_items,
        deleted_by = %account.username,
        "Supplier deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /suppliers/summary/
async fn summary(State(state): State<AppState>) -> Result<Json<Vec<SupplierSummary>>, AppError> {
    let summaries = SummaryRepository::new(state.pool()).suppliers().await?;
    Ok(Json(summaries))
}
