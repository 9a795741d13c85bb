use async_trait::async_trait;
use axum_helpers::{Page, PageRequest, SortDirection};
use database::BaseRepository;
use domain_categories::models::Category;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ExprTrait,
    JoinType,
    LoaderTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    TransactionTrait,
};

use crate::{
    entity::{product, product_category},
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, ProductFilter, UpdateProduct},
    repository::{ProductRepository, distinct_ids},
};

pub struct PgProductRepository {
    base: BaseRepository<product::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn sort_column(page: &PageRequest) -> product::Column {
        match page.sort() {
            "name" => product::Column::Name,
            "price" => product::Column::Price,
            "date" => product::Column::Date,
            _ => product::Column::Id,
        }
    }
}

fn to_product(model: product::Model, categories: Vec<Category>) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        img_url: model.img_url,
        date: model.date,
        categories,
    }
}

/// Resolve every distinct category id and write the join rows.
///
/// Any unknown id fails the whole call; run inside the surrounding
/// write transaction so nothing partial survives.
async fn attach_categories<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    category_ids: &[i64],
) -> ProductResult<Vec<Category>> {
    let mut categories = Vec::new();

    for category_id in distinct_ids(category_ids) {
        let category = domain_categories::entity::Entity::find_by_id(category_id)
            .one(conn)
            .await?
            .ok_or(ProductError::UnknownCategory(category_id))?;

        product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(category_id),
        }
        .insert(conn)
        .await?;

        categories.push(category.into());
    }

    Ok(categories)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let txn = self.base.db().begin().await?;

        let active_model = product::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            img_url: Set(input.img_url),
            date: Set(input.date),
        };
        let model = active_model.insert(&txn).await?;

        let categories = attach_categories(&txn, model.id, &input.category_ids).await?;

        txn.commit().await?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(to_product(model, categories))
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let Some(model) = self.base.find_by_id(id).await? else {
            return Ok(None);
        };

        let categories = model
            .find_related(domain_categories::entity::Entity)
            .all(self.base.db())
            .await?;

        Ok(Some(to_product(
            model,
            categories.into_iter().map(|c| c.into()).collect(),
        )))
    }

    async fn search(&self, filter: ProductFilter) -> ProductResult<Page<Product>> {
        let db = self.base.db();

        let mut query = product::Entity::find();

        if let Some(category_id) = filter.category_id() {
            // A product linked to the category several times must still
            // appear once, hence DISTINCT over the join
            query = query
                .join(
                    JoinType::InnerJoin,
                    product_category::Relation::Product.def().rev(),
                )
                .filter(product_category::Column::CategoryId.eq(category_id))
                .distinct();
        }

        if let Some(name) = filter.name() {
            let pattern = format!("%{}%", name.to_lowercase());
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    product::Entity,
                    product::Column::Name,
                ))))
                .like(pattern),
            );
        }

        let total = query.clone().count(db).await?;

        let page = filter.page_request();
        let column = Self::sort_column(&page);
        let mut query = match page.direction() {
            SortDirection::Asc => query.order_by_asc(column),
            SortDirection::Desc => query.order_by_desc(column),
        };
        // Stable ordering when sorting on a non-unique column
        query = query.order_by_asc(product::Column::Id);

        let models = query
            .offset(page.offset())
            .limit(page.size())
            .all(db)
            .await?;

        let category_models = models
            .load_many_to_many(
                domain_categories::entity::Entity,
                product_category::Entity,
                db,
            )
            .await?;

        let content = models
            .into_iter()
            .zip(category_models)
            .map(|(model, categories)| {
                to_product(model, categories.into_iter().map(|c| c.into()).collect())
            })
            .collect();

        Ok(Page::new(content, page.page(), page.size(), total))
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let txn = self.base.db().begin().await?;

        let model = product::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let active_model = product::ActiveModel {
            id: Set(model.id),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            img_url: Set(input.img_url),
            date: Set(input.date),
        };
        let updated = active_model.update(&txn).await?;

        // Clear-and-rebuild the association set
        product_category::Entity::delete_many()
            .filter(product_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        let categories = attach_categories(&txn, id, &input.category_ids).await?;

        txn.commit().await?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(to_product(updated, categories))
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        // Join rows go with the product (ON DELETE CASCADE)
        match self.base.delete_by_id(id).await {
            Ok(rows_affected) => {
                if rows_affected > 0 {
                    tracing::info!(product_id = %id, "Deleted product");
                }
                Ok(rows_affected > 0)
            }
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "Product delete rejected");
                Err(ProductError::DeleteConflict(id))
            }
        }
    }
}
