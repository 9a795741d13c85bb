use axum_helpers::{PageRequest, SortDirection};
use chrono::{DateTime, Utc};
use domain_categories::models::{Category, CategoryResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Product domain model with its hydrated category associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: Option<String>,
    pub date: DateTime<Utc>,
    pub categories: Vec<Category>,
}

/// Product projection returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: Option<String>,
    pub date: DateTime<Utc>,
    pub categories: Vec<CategoryResponse>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            date: product.date,
            categories: product
                .categories
                .into_iter()
                .map(CategoryResponse::from)
                .collect(),
        }
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255, message = "name must not be blank"))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    pub img_url: Option<String>,
    pub date: DateTime<Utc>,
    /// Category ids to associate; duplicates are collapsed
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// DTO for updating an existing product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255, message = "name must not be blank"))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    pub img_url: Option<String>,
    pub date: DateTime<Utc>,
    /// Replacement category set; the previous association is discarded
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Query parameters for the product search endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Restrict to products in this category; 0 or absent means no filter
    pub category_id: Option<i64>,
    /// Case-insensitive substring match on the product name
    pub name: Option<String>,
    /// Zero-based page index (default 0)
    pub page: Option<u64>,
    /// Page size (default 20, capped at 100)
    pub size: Option<u64>,
    /// Field to sort by: id, name, price or date (default "id")
    pub sort: Option<String>,
    /// Sort direction (default ascending)
    pub direction: Option<SortDirection>,
}

impl ProductFilter {
    /// Effective category filter; the 0 sentinel means "all categories"
    pub fn category_id(&self) -> Option<i64> {
        self.category_id.filter(|id| *id > 0)
    }

    /// Effective name filter; blank strings mean "no filter"
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The pagination/sort part of this filter
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
            direction: self.direction,
        }
    }
}
