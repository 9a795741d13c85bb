use axum_helpers::{Page, PageRequest};
use std::sync::Arc;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{CategoryResponse, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

/// Service layer for Category business logic
#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List categories, paginated
    pub async fn find_all_paged(&self, page: PageRequest) -> CategoryResult<Page<CategoryResponse>> {
        let categories = self.repository.list(page).await?;
        Ok(categories.map(CategoryResponse::from))
    }

    /// Get a category by ID
    pub async fn find_by_id(&self, id: i64) -> CategoryResult<CategoryResponse> {
        let category = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        Ok(category.into())
    }

    /// Create a new category
    pub async fn insert(&self, input: CreateCategory) -> CategoryResult<CategoryResponse> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        let created = self.repository.create(input).await?;
        Ok(created.into())
    }

    /// Update an existing category
    pub async fn update(&self, id: i64, input: UpdateCategory) -> CategoryResult<CategoryResponse> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        let updated = self.repository.update(id, input).await?;
        Ok(updated.into())
    }

    /// Delete a category
    pub async fn delete(&self, id: i64) -> CategoryResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(CategoryError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::repository::MockCategoryRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn sample_category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let mut mock_repo = MockCategoryRepository::new();
        let category = sample_category(1, "Books");
        let expected = category.clone();

        mock_repo
            .expect_get_by_id()
            .with(eq(1))
            .returning(move |_| Ok(Some(category.clone())));

        let service = CategoryService::new(mock_repo);
        let response = service.find_by_id(1).await.unwrap();

        assert_eq!(response.id, expected.id);
        assert_eq!(response.name, expected.name);
    }

    #[tokio::test]
    async fn test_find_by_id_missing_maps_to_not_found() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo.expect_get_by_id().with(eq(99)).returning(|_| Ok(None));

        let service = CategoryService::new(mock_repo);
        let result = service.find_by_id(99).await;

        assert!(matches!(result, Err(CategoryError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let mut mock_repo = MockCategoryRepository::new();
        // The repository must never be reached on invalid input
        mock_repo.expect_create().never();

        let service = CategoryService::new(mock_repo);
        let result = service
            .insert(CreateCategory {
                name: String::new(),
            })
            .await;

        assert!(matches!(result, Err(CategoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_maps_to_not_found() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo.expect_delete().with(eq(7)).returning(|_| Ok(false));

        let service = CategoryService::new(mock_repo);
        let result = service.delete(7).await;

        assert!(matches!(result, Err(CategoryError::NotFound(7))));
    }

    #[tokio::test]
    async fn test_delete_conflict_propagates() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_delete()
            .with(eq(3))
            .returning(|_| Err(CategoryError::InUse(3)));

        let service = CategoryService::new(mock_repo);
        let result = service.delete(3).await;

        assert!(matches!(result, Err(CategoryError::InUse(3))));
    }

    #[tokio::test]
    async fn test_find_all_paged_maps_projection() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo.expect_list().returning(|page| {
            Ok(Page::new(
                vec![sample_category(1, "Books"), sample_category(2, "Garden")],
                page.page(),
                page.size(),
                2,
            ))
        });

        let service = CategoryService::new(mock_repo);
        let page = service.find_all_paged(PageRequest::default()).await.unwrap();

        assert_eq!(page.total_elements, 2);
        assert_eq!(page.content[0].name, "Books");
    }
}
