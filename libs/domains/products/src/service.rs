use axum_helpers::Page;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, ProductFilter, ProductResponse, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Search products with optional category/name filters, paginated
    pub async fn find_all_paged(&self, filter: ProductFilter) -> ProductResult<Page<ProductResponse>> {
        let products = self.repository.search(filter).await?;
        Ok(products.map(ProductResponse::from))
    }

    /// Get a product by ID
    pub async fn find_by_id(&self, id: i64) -> ProductResult<ProductResponse> {
        let product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        Ok(product.into())
    }

    /// Create a new product with its category associations
    pub async fn insert(&self, input: CreateProduct) -> ProductResult<ProductResponse> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let created = self.repository.create(input).await?;
        Ok(created.into())
    }

    /// Update a product, replacing its category associations
    pub async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<ProductResponse> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let updated = self.repository.update(id, input).await?;
        Ok(updated.into())
    }

    /// Delete a product
    pub async fn delete(&self, id: i64) -> ProductResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::repository::MockProductRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn sample_product(id: i64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price: 100.0,
            img_url: None,
            date: Utc::now(),
            categories: vec![],
        }
    }

    fn create_input(name: &str, price: f64) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price,
            img_url: None,
            date: Utc::now(),
            category_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_find_by_id_missing_maps_to_not_found() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo.expect_get_by_id().with(eq(42)).returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service.find_by_id(42).await;

        assert!(matches!(result, Err(ProductError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_price() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let result = service.insert(create_input("PC Gamer", -1.0)).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let result = service.insert(create_input("", 100.0)).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_insert_unknown_category_propagates() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_create()
            .returning(|_| Err(ProductError::UnknownCategory(7)));

        let service = ProductService::new(mock_repo);
        let result = service.insert(create_input("PC Gamer", 800.0)).await;

        assert!(matches!(result, Err(ProductError::UnknownCategory(7))));
    }

    #[tokio::test]
    async fn test_delete_missing_maps_to_not_found() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo.expect_delete().with(eq(9)).returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let result = service.delete(9).await;

        assert!(matches!(result, Err(ProductError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_delete_conflict_propagates() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_delete()
            .with(eq(5))
            .returning(|_| Err(ProductError::DeleteConflict(5)));

        let service = ProductService::new(mock_repo);
        let result = service.delete(5).await;

        assert!(matches!(result, Err(ProductError::DeleteConflict(5))));
    }

    #[tokio::test]
    async fn test_find_all_paged_maps_projection() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo.expect_search().returning(|filter| {
            let page = filter.page_request();
            Ok(Page::new(
                vec![sample_product(1, "Macbook Pro")],
                page.page(),
                page.size(),
                1,
            ))
        });

        let service = ProductService::new(mock_repo);
        let page = service
            .find_all_paged(ProductFilter::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].name, "Macbook Pro");
    }
}
