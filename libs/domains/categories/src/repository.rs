use async_trait::async_trait;
use axum_helpers::{Page, PageRequest, SortDirection};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CreateCategory, UpdateCategory};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category>;

    /// Get a category by ID
    async fn get_by_id(&self, id: i64) -> CategoryResult<Option<Category>>;

    /// List categories, paginated and sorted
    async fn list(&self, page: PageRequest) -> CategoryResult<Page<Category>>;

    /// Update an existing category
    async fn update(&self, id: i64, input: UpdateCategory) -> CategoryResult<Category>;

    /// Delete a category by ID, returning whether a row was removed
    async fn delete(&self, id: i64) -> CategoryResult<bool>;
}

/// In-memory implementation of CategoryRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<i64, Category>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        let category = Category {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: input.name,
            created_at: Utc::now(),
            updated_at: None,
        };
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: i64) -> CategoryResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> CategoryResult<Page<Category>> {
        let categories = self.categories.read().await;

        let mut result: Vec<Category> = categories.values().cloned().collect();

        match page.sort() {
            "name" => result.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
            _ => result.sort_by_key(|c| c.id),
        }
        if page.direction() == SortDirection::Desc {
            result.reverse();
        }

        let total = result.len() as u64;
        let content: Vec<Category> = result
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size() as usize)
            .collect();

        Ok(Page::new(content, page.page(), page.size(), total))
    }

    async fn update(&self, id: i64, input: UpdateCategory) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        let category = categories
            .get_mut(&id)
            .ok_or(CategoryError::NotFound(id))?;
        category.name = input.name;
        category.updated_at = Some(Utc::now());
        let updated = category.clone();

        tracing::info!(category_id = %id, "Updated category");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> CategoryResult<bool> {
        let mut categories = self.categories.write().await;

        if categories.remove(&id).is_some() {
            tracing::info!(category_id = %id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(name: &str) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_category() {
        let repo = InMemoryCategoryRepository::new();

        let created = repo.create(create_input("Books")).await.unwrap();
        assert_eq!(created.name, "Books");
        assert!(created.updated_at.is_none());

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryCategoryRepository::new();

        let first = repo.create(create_input("Books")).await.unwrap();
        let second = repo.create(create_input("Electronics")).await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let repo = InMemoryCategoryRepository::new();
        for name in ["Garden", "Books", "Electronics"] {
            repo.create(create_input(name)).await.unwrap();
        }

        let page = repo
            .list(PageRequest {
                sort: Some("name".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let names: Vec<&str> = page.content.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Electronics", "Garden"]);
        assert_eq!(page.total_elements, 3);
    }

    #[tokio::test]
    async fn test_list_unknown_sort_falls_back_to_id() {
        let repo = InMemoryCategoryRepository::new();
        for name in ["Garden", "Books"] {
            repo.create(create_input(name)).await.unwrap();
        }

        let page = repo
            .list(PageRequest {
                sort: Some("bogus".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let names: Vec<&str> = page.content.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Garden", "Books"]);
    }

    #[tokio::test]
    async fn test_list_page_past_the_end_is_empty() {
        let repo = InMemoryCategoryRepository::new();
        repo.create(create_input("Books")).await.unwrap();

        let page = repo
            .list(PageRequest {
                page: Some(5),
                size: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 1);
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at() {
        let repo = InMemoryCategoryRepository::new();
        let created = repo.create(create_input("Books")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateCategory {
                    name: "Used Books".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Used Books");
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let repo = InMemoryCategoryRepository::new();

        let result = repo
            .update(
                42,
                UpdateCategory {
                    name: "Nope".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(CategoryError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_delete_category() {
        let repo = InMemoryCategoryRepository::new();
        let created = repo.create(create_input("Books")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), None);
    }
}
