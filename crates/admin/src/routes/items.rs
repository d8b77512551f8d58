//! Item route handlers, including the stock filters and summary.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use stockroom_core::{CategoryId, ItemId};

use crate::db::{ItemRepository, SummaryRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{FieldErrors, Item, ItemPayload, StockSummary};
use crate::state::AppState;

/// Build the item router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items/", get(list).post(create))
        .route("/items/below_threshold/", get(below_threshold))
        .route("/items/by_category/", get(by_category))
        .route("/items/stock_summary/", get(stock_summary))
        .route(
            "/items/{id}/",
            get(show).put(replace).patch(update).delete(destroy),
        )
}

/// GET /items/
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    let items = ItemRepository::new(state.pool()).list().await?;
    Ok(Json(items))
}

/// GET /items/{id}/
async fn show(
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = path?;
    let item = ItemRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("item", id))?;
    Ok(Json(item))
}

/// POST /items/
async fn create(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let Json(payload) = payload?;
    let input = payload.validate()?;

    let item = ItemRepository::new(state.pool())
        .create(&input, account.id)
        .await?;

    tracing::info!(
        item_id = %item.id,
        category_id = %item.category,
        supplier_id = %item.supplier,
        created_by = %account.username,
        "Item created"
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /items/{id}/
///
/// Omitted `description`, `stock_quantity` and `threshold` keep their
/// stored values.
async fn replace(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let repo = ItemRepository::new(state.pool());

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("item", id))?;
    let input = payload.over_optional(&existing).validate()?;

    let item = repo
        .update(id, &input)
        .await
        .map_err(|e| AppError::from_repository(e, "item", id))?;
    Ok(Json(item))
}

/// PATCH /items/{id}/
async fn update(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let repo = ItemRepository::new(state.pool());

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("item", id))?;
    let input = payload.over(&existing).validate()?;

    let item = repo
        .update(id, &input)
        .await
        .map_err(|e| AppError::from_repository(e, "item", id))?;
    Ok(Json(item))
}

/// DELETE /items/{id}/
async fn destroy(
    RequireAuth(account): RequireAuth,
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    ItemRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| AppError::from_repository(e, "item", id))?;

    tracing::info!(item_id = %id, deleted_by = %account.username, "Item deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /items/below_threshold/
async fn below_threshold(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    let items = ItemRepository::new(state.pool()).below_threshold().await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
struct ByCategoryQuery {
    category_id: Option<String>,
}

/// Resolve the `category_id` query parameter.
///
/// Missing or blank is a bad request; anything that is not an integer is a
/// validation failure.
fn parse_category_id(raw: Option<&str>) -> Result<CategoryId, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("category_id parameter is required".to_owned()))?;

    raw.parse().map_err(|_| {
        AppError::Validation(FieldErrors::single(
            "category_id",
            "A valid integer is required.",
        ))
    })
}

/// GET /items/by_category/?category_id=<id>
async fn by_category(
    State(state): State<AppState>,
    query: Result<Query<ByCategoryQuery>, QueryRejection>,
) -> Result<Json<Vec<Item>>, AppError> {
    let Query(query) = query?;
    let category = parse_category_id(query.category_id.as_deref())?;

    let items = ItemRepository::new(state.pool())
        .by_category(category)
        .await?;
    Ok(Json(items))
}

/// GET /items/stock_summary/
async fn stock_summary(State(state): State<AppState>) -> Result<Json<StockSummary>, AppError> {
    let summary = SummaryRepository::new(state.pool()).stock().await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_id() {
        assert!(matches!(
            parse_category_id(Some(" 3 ")),
            Ok(id) if id == CategoryId::new(3)
        ));
        assert!(matches!(parse_category_id(None), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_category_id(Some("")), Err(AppError::BadRequest(_))));
        assert!(matches!(
            parse_category_id(Some("abc")),
            Err(AppError::Validation(_))
        ));
    }
}
