//! Handler tests for the Products domain
//!
//! These tests verify request deserialization, response serialization,
//! HTTP status codes and error responses against the in-memory
//! repository; persistence behavior is covered in `postgres_test.rs`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use domain_categories::models::Category;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

fn known_categories() -> Vec<Category> {
    vec![
        Category {
            id: 1,
            name: "Books".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        },
        Category {
            id: 2,
            name: "Electronics".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        },
        Category {
            id: 3,
            name: "Computers".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        },
    ]
}

fn service() -> ProductService<InMemoryProductRepository> {
    ProductService::new(InMemoryProductRepository::with_categories(
        known_categories(),
    ))
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn product_json(name: &str, price: f64, category_ids: &[i64]) -> serde_json::Value {
    json!({
        "name": name,
        "description": "test product",
        "price": price,
        "img_url": null,
        "date": "2020-07-14T10:00:00Z",
        "category_ids": category_ids,
    })
}

fn post_product(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_create_product_handler_returns_201() {
    let app = handlers::router(service());

    let response = app
        .oneshot(post_product(product_json("Macbook Pro", 1250.0, &[3])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(product.name, "Macbook Pro");
    assert_eq!(product.categories.len(), 1);
    assert_eq!(product.categories[0].name, "Computers");
}

#[tokio::test]
async fn test_create_product_handler_rejects_negative_price() {
    let app = handlers::router(service());

    let response = app
        .oneshot(post_product(product_json("Macbook Pro", -10.0, &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_product_handler_unknown_category_returns_422() {
    let app = handlers::router(service());

    let response = app
        .oneshot(post_product(product_json("Macbook Pro", 1250.0, &[99])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_product_handler_returns_404_for_missing() {
    let app = handlers::router(service());

    let request = Request::builder()
        .method("GET")
        .uri("/9999")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_products_handler_filters_by_name() {
    let service = service();
    for (name, price) in [("Macbook Pro", 1250.0), ("PC Gamer", 800.0)] {
        service
            .insert(CreateProduct {
                name: name.to_string(),
                description: String::new(),
                price,
                img_url: None,
                date: Utc::now(),
                category_ids: vec![3],
            })
            .await
            .unwrap();
    }

    let app = handlers::router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/?name=gamer")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let page: axum_helpers::Page<ProductResponse> = json_body(response.into_body()).await;
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].name, "PC Gamer");
}

#[tokio::test]
async fn test_update_product_handler_returns_200() {
    let service = service();
    let created = service
        .insert(CreateProduct {
            name: "PC Gamer".to_string(),
            description: String::new(),
            price: 800.0,
            img_url: None,
            date: Utc::now(),
            category_ids: vec![3],
        })
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", created.id))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&product_json("PC Gamer Ex", 900.0, &[1, 2])).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let product: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(product.name, "PC Gamer Ex");
    assert_eq!(product.categories.len(), 2);
}

#[tokio::test]
async fn test_delete_product_handler_returns_204() {
    let service = service();
    let created = service
        .insert(CreateProduct {
            name: "PC Gamer".to_string(),
            description: String::new(),
            price: 800.0,
            img_url: None,
            date: Utc::now(),
            category_ids: vec![],
        })
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
