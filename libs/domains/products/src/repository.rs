use async_trait::async_trait;
use axum_helpers::{Page, SortDirection};
use domain_categories::models::Category;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product with its category associations
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID with hydrated categories
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Search products by optional category membership and name
    /// substring, paginated
    async fn search(&self, filter: ProductFilter) -> ProductResult<Page<Product>>;

    /// Update a product, replacing its category associations
    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product by ID, returning whether a row was removed
    async fn delete(&self, id: i64) -> ProductResult<bool>;
}

/// Collapse duplicate ids while keeping first-seen order
pub(crate) fn distinct_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// Category resolution checks against a fixed set of known categories
/// supplied at construction, standing in for the FK lookups the
/// PostgreSQL implementation performs.
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<i64, Product>>>,
    categories: Arc<HashMap<i64, Category>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::with_categories(Vec::new())
    }

    /// Build a repository that resolves category ids against `categories`
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            categories: Arc::new(categories.into_iter().map(|c| (c.id, c)).collect()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn resolve_categories(&self, ids: &[i64]) -> ProductResult<Vec<Category>> {
        distinct_ids(ids)
            .into_iter()
            .map(|id| {
                self.categories
                    .get(&id)
                    .cloned()
                    .ok_or(ProductError::UnknownCategory(id))
            })
            .collect()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let categories = self.resolve_categories(&input.category_ids)?;
        let mut products = self.products.write().await;

        let product = Product {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: input.name,
            description: input.description,
            price: input.price,
            img_url: input.img_url,
            date: input.date,
            categories,
        };
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn search(&self, filter: ProductFilter) -> ProductResult<Page<Product>> {
        let products = self.products.read().await;

        let name_needle = filter.name().map(str::to_lowercase);
        let mut result: Vec<Product> = products
            .values()
            .filter(|p| {
                if let Some(category_id) = filter.category_id() {
                    if !p.categories.iter().any(|c| c.id == category_id) {
                        return false;
                    }
                }
                if let Some(ref needle) = name_needle {
                    if !p.name.to_lowercase().contains(needle) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        let page = filter.page_request();
        match page.sort() {
            "name" => result.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
            "price" => result.sort_by(|a, b| {
                a.price
                    .total_cmp(&b.price)
                    .then(a.id.cmp(&b.id))
            }),
            "date" => result.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id))),
            _ => result.sort_by_key(|p| p.id),
        }
        if page.direction() == SortDirection::Desc {
            result.reverse();
        }

        let total = result.len() as u64;
        let content: Vec<Product> = result
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size() as usize)
            .collect();

        Ok(Page::new(content, page.page(), page.size(), total))
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let categories = self.resolve_categories(&input.category_ids)?;
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;
        product.name = input.name;
        product.description = input.description;
        product.price = input.price;
        product.img_url = input.img_url;
        product.date = input.date;
        product.categories = categories;
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
