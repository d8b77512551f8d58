//! Integration tests for items, stock filters and the stock summary.
//!
//! Requires a `PostgreSQL` database at `TEST_DATABASE_URL`.

use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use stockroom_integration_tests::TestContext;

fn names(items: &Value) -> Vec<&str> {
    items
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|item| item["name"].as_str())
        .collect()
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_item_detail_shape() {
    let ctx = TestContext::new().await;
    let id = ctx.id_of("item", "Headphones").await;

    let (status, item) = ctx.get(&format!("/items/{id}/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["price"], "89.99");
    assert_eq!(item["stock_quantity"], 5);
    assert_eq!(item["threshold"], 5);
    assert_eq!(item["stock_value"], "449.95");
    assert_eq!(item["category_name"], "Electronics");
    assert_eq!(item["supplier_name"], "ElectroTech Inc.");
    assert_eq!(item["created_by"], "admin");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_below_threshold_is_strict() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    // Headphones hold exactly the threshold
    let (status, items) = ctx.get("/items/below_threshold/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(names(&items).is_empty());

    let id = ctx.id_of("item", "Headphones").await;
    let (status, _) = ctx
        .send(
            Method::PATCH,
            &format!("/items/{id}/"),
            Some(&json!({ "stock_quantity": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, items) = ctx.get("/items/below_threshold/").await;
    assert_eq!(names(&items), ["Headphones"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_by_category() {
    let ctx = TestContext::new().await;
    let id = ctx.id_of("category", "Electronics").await;

    let (status, items) = ctx
        .get(&format!("/items/by_category/?category_id={id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&items), ["Laptop", "Smartphone", "Headphones"]);

    let (status, items) = ctx.get("/items/by_category/?category_id=9999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(names(&items).is_empty());

    let (status, body) = ctx.get("/items/by_category/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "category_id parameter is required");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_stock_summary() {
    let ctx = TestContext::new().await;

    let (status, summary) = ctx.get("/items/stock_summary/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_items"], 6);
    assert_eq!(summary["total_stock"], 380);
    assert_eq!(summary["total_value"], "21546.20");
    assert_eq!(summary["avg_price"], "286.16");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_create_item_defaults_and_references() {
    let ctx = TestContext::new().await;
    ctx.login().await;
    let category = ctx.id_of("category", "Office Supplies").await;
    let supplier = ctx.id_of("supplier", "Fresh Foods Ltd.").await;

    let (status, item) = ctx
        .send(
            Method::POST,
            "/items/",
            Some(&json!({
                "name": "Stapler",
                "category": category,
                "supplier": supplier,
                "price": "7.5",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["price"], "7.50");
    assert_eq!(item["stock_quantity"], 0);
    assert_eq!(item["threshold"], 5);
    assert_eq!(item["stock_value"], "0.00");

    let (status, body) = ctx
        .send(
            Method::POST,
            "/items/",
            Some(&json!({
                "name": "Ghost",
                "category": 9999,
                "supplier": supplier,
                "price": "1.00",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["category"][0],
        "Invalid pk - object does not exist."
    );
    assert_eq!(ctx.count("item").await, 7);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_put_keeps_stock_when_omitted() {
    let ctx = TestContext::new().await;
    ctx.login().await;
    let id = ctx.id_of("item", "Notebook").await;
    let category = ctx.id_of("category", "Office Supplies").await;
    let supplier = ctx.id_of("supplier", "ElectroTech Inc.").await;

    let (status, item) = ctx
        .send(
            Method::PUT,
            &format!("/items/{id}/"),
            Some(&json!({
                "name": "Spiral Notebook",
                "category": category,
                "supplier": supplier,
                "price": "3.49",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["name"], "Spiral Notebook");
    assert_eq!(item["price"], "3.49");
    assert_eq!(item["stock_quantity"], 200);
    assert_eq!(item["threshold"], 5);
    assert_eq!(item["stock_value"], "698.00");

    let (status, _) = ctx
        .send(
            Method::PUT,
            "/items/9999/",
            Some(&json!({
                "name": "Ghost",
                "category": category,
                "supplier": supplier,
                "price": "1.00",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_item_field_validation() {
    let ctx = TestContext::new().await;
    ctx.login().await;
    let id = ctx.id_of("item", "Laptop").await;
    let path = format!("/items/{id}/");

    let (status, body) = ctx
        .send(
            Method::PATCH,
            &path,
            Some(&json!({ "price": "1.999", "stock_quantity": -1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["price"].is_array());
    assert!(body["fields"]["stock_quantity"].is_array());

    let (status, body) = ctx
        .send(Method::PUT, &path, Some(&json!({ "name": "Laptop" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["category", "supplier", "price"] {
        assert!(body["fields"][field].is_array(), "{field}");
    }

    let (_, laptop) = ctx.get(&path).await;
    assert_eq!(laptop["price"], "999.99");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_delete_item() {
    let ctx = TestContext::new().await;
    ctx.login().await;
    let id = ctx.id_of("item", "T-Shirt").await;

    let (status, _) = ctx.send(Method::DELETE, &format!("/items/{id}/"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(ctx.count("item").await, 5);
    assert_eq!(ctx.count("category").await, 4);

    let (status, body) = ctx.get(&format!("/items/{id}/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
