use async_trait::async_trait;
use axum_helpers::{Page, PageRequest, SortDirection};
use chrono::Utc;
use database::BaseRepository;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};

use crate::{
    entity,
    error::{CategoryError, CategoryResult},
    models::{Category, CreateCategory, UpdateCategory},
    repository::CategoryRepository,
};

pub struct PgCategoryRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn sort_column(page: &PageRequest) -> entity::Column {
        match page.sort() {
            "name" => entity::Column::Name,
            _ => entity::Column::Id,
        }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let model = self.base.insert(active_model).await?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> CategoryResult<Option<Category>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(|m| m.into()))
    }

    async fn list(&self, page: PageRequest) -> CategoryResult<Page<Category>> {
        let total = entity::Entity::find().count(self.base.db()).await?;

        let column = Self::sort_column(&page);
        let mut query = match page.direction() {
            SortDirection::Asc => entity::Entity::find().order_by_asc(column),
            SortDirection::Desc => entity::Entity::find().order_by_desc(column),
        };
        // Stable ordering when sorting on a non-unique column
        query = query.order_by_asc(entity::Column::Id);

        let models = query
            .offset(page.offset())
            .limit(page.size())
            .all(self.base.db())
            .await?;

        Ok(Page::new(
            models.into_iter().map(|m| m.into()).collect(),
            page.page(),
            page.size(),
            total,
        ))
    }

    async fn update(&self, id: i64, input: UpdateCategory) -> CategoryResult<Category> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let active_model = entity::ActiveModel {
            id: Set(model.id),
            name: Set(input.name),
            created_at: Set(model.created_at),
            updated_at: Set(Some(Utc::now())),
        };

        let updated = self.base.update(active_model).await?;

        tracing::info!(category_id = %id, "Updated category");
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> CategoryResult<bool> {
        // A store failure here is the RESTRICT FK from tb_product_category
        match self.base.delete_by_id(id).await {
            Ok(rows_affected) => {
                if rows_affected > 0 {
                    tracing::info!(category_id = %id, "Deleted category");
                }
                Ok(rows_affected > 0)
            }
            Err(e) => {
                tracing::warn!(category_id = %id, error = %e, "Category delete rejected");
                Err(CategoryError::InUse(id))
            }
        }
    }
}
