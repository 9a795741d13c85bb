//! PostgreSQL integration tests for the Categories domain
//!
//! Requires Docker (testcontainers). Each test spins up its own
//! PostgreSQL container with migrations applied.

use axum_helpers::{PageRequest, SortDirection};
use domain_categories::*;
use test_utils::{TestDataBuilder, TestDatabase};

#[tokio::test]
async fn test_category_crud_roundtrip() {
    let db = TestDatabase::new().await;
    let repo = PgCategoryRepository::new(db.connection());
    let service = CategoryService::new(repo);
    let builder = TestDataBuilder::from_test_name("category_crud");

    let created = service
        .insert(CreateCategory {
            name: builder.name("category", "crud"),
        })
        .await
        .unwrap();
    assert!(created.id > 0);
    assert!(created.updated_at.is_none());

    let fetched = service.find_by_id(created.id).await.unwrap();
    assert_eq!(fetched.name, created.name);

    let updated = service
        .update(
            created.id,
            UpdateCategory {
                name: builder.name("category", "renamed"),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, builder.name("category", "renamed"));
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.created_at, created.created_at);

    service.delete(created.id).await.unwrap();

    let missing = service.find_by_id(created.id).await;
    assert!(matches!(missing, Err(CategoryError::NotFound(_))));
}

#[tokio::test]
async fn test_category_list_sorted_by_name() {
    let db = TestDatabase::new().await;
    let repo = PgCategoryRepository::new(db.connection());
    let service = CategoryService::new(repo);

    for name in ["Garden", "Books", "Electronics"] {
        service
            .insert(CreateCategory {
                name: name.to_string(),
            })
            .await
            .unwrap();
    }

    let page = service
        .find_all_paged(PageRequest {
            sort: Some("name".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<&str> = page.content.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Books", "Electronics", "Garden"]);

    let descending = service
        .find_all_paged(PageRequest {
            sort: Some("name".to_string()),
            direction: Some(SortDirection::Desc),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(descending.content[0].name, "Garden");
}

#[tokio::test]
async fn test_category_page_past_the_end_is_empty() {
    let db = TestDatabase::new().await;
    let repo = PgCategoryRepository::new(db.connection());
    let service = CategoryService::new(repo);

    for i in 0..3 {
        service
            .insert(CreateCategory {
                name: format!("Category {}", i),
            })
            .await
            .unwrap();
    }

    let page = service
        .find_all_paged(PageRequest {
            page: Some(10),
            size: Some(10),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 3);
    assert!(page.last);
}

#[tokio::test]
async fn test_delete_missing_category_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgCategoryRepository::new(db.connection());
    let service = CategoryService::new(repo);

    let result = service.delete(999_999).await;
    assert!(matches!(result, Err(CategoryError::NotFound(999_999))));
}
