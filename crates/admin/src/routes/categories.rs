//! Category route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};

use stockroom_core::CategoryId;

use crate::db::{CategoryRepository, SummaryRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{Category, CategoryPayload, CategorySummary};
use crate::state::AppState;

/// Build the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories/", get(list).post(create))
        .route("/categories/summary/", get(summary))
        .route(
            "/categories/{id}/",
            get(show).put(replace).patch(update).delete(destroy),
        )
}

/// GET /categories/
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// GET /categories/{id}/
async fn show(
    State(state): State<AppState>,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<Category>, AppError> {
    let Path(id) = path?;
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("category", id))?;
    Ok(Json(category))
}

/// POST /categories/
async fn create(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let Json(payload) = payload?;
    let input = payload.validate()?;

    let category = CategoryRepository::new(state.pool())
        .create(&input, account.id)
        .await?;

    tracing::info!(
        category_id = %category.id,
        created_by = %account.username,
        "Category created"
    );
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/{id}/
///
/// Omitted optional fields keep their stored values.
async fn replace(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<CategoryId>, PathRejection>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let repo = CategoryRepository::new(state.pool());

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("category", id))?;
    let input = payload.over_optional(&existing).validate()?;

    let category = repo
        .update(id, &input)
        .await
        .map_err(|e| AppError::from_repository(e, "category", id))?;
    Ok(Json(category))
}

/// PATCH /categories/{id}/
async fn update(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<CategoryId>, PathRejection>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let repo = CategoryRepository::new(state.pool());

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("category", id))?;
    let input = payload.over(&existing).validate()?;

    let category = repo
        .update(id, &input)
        .await
        .map_err(|e| AppError::from_repository(e, "category", id))?;
    Ok(Json(category))
}

/// DELETE /categories/{id}/
///
/// Items in the category are removed by the foreign key cascade.
async fn destroy(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let removed_items = CategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| AppError::from_repository(e, "category", id))?;

    tracing::info!(
        category_id = %id,
        removed_items,
        deleted_by = %account.username,
        "Category deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /categories/summary/
async fn summary(State(state): State<AppState>) -> Result<Json<Vec<CategorySummary>>, AppError> {
    let summaries = SummaryRepository::new(state.pool()).categories().await?;
    Ok(Json(summaries))
}
