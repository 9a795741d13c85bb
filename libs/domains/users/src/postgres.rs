use async_trait::async_trait;
use axum_helpers::{Page, PageRequest, SortDirection};
use database::BaseRepository;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

use crate::{
    entity::{role, user, user_role},
    error::{UserError, UserResult},
    models::{CreateUser, Role, UpdateUser, User},
    repository::{UserRepository, distinct_ids, duplicate_email_error},
};

pub struct PgUserRepository {
    base: BaseRepository<user::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn sort_column(page: &PageRequest) -> user::Column {
        match page.sort() {
            "first_name" => user::Column::FirstName,
            "email" => user::Column::Email,
            _ => user::Column::Id,
        }
    }
}

fn to_user(model: user::Model, roles: Vec<Role>) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        password: model.password,
        roles,
    }
}

/// Resolve every distinct role id and write the join rows.
///
/// Any unknown id fails the whole call; run inside the surrounding
/// write transaction so nothing partial survives.
async fn attach_roles<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    role_ids: &[i64],
) -> UserResult<Vec<Role>> {
    let mut roles = Vec::new();

    for role_id in distinct_ids(role_ids) {
        let role = role::Entity::find_by_id(role_id)
            .one(conn)
            .await?
            .ok_or(UserError::UnknownRole(role_id))?;

        user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        }
        .insert(conn)
        .await?;

        roles.push(role.into());
    }

    Ok(roles)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let txn = self.base.db().begin().await?;

        let active_model = user::ActiveModel {
            id: NotSet,
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            password: Set(input.password),
        };

        // The unique index is the authoritative duplicate check; a
        // violation here gets the same field error the gate produces.
        let model = active_model.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                duplicate_email_error()
            } else {
                UserError::Database(e)
            }
        })?;

        let roles = attach_roles(&txn, model.id, &input.role_ids).await?;

        txn.commit().await?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(to_user(model, roles))
    }

    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let Some(model) = self.base.find_by_id(id).await? else {
            return Ok(None);
        };

        let roles = model
            .find_related(role::Entity)
            .all(self.base.db())
            .await?;

        Ok(Some(to_user(
            model,
            roles.into_iter().map(|r| r.into()).collect(),
        )))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let Some(model) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.base.db())
            .await?
        else {
            return Ok(None);
        };

        let roles = model
            .find_related(role::Entity)
            .all(self.base.db())
            .await?;

        Ok(Some(to_user(
            model,
            roles.into_iter().map(|r| r.into()).collect(),
        )))
    }

    async fn list(&self, page: PageRequest) -> UserResult<Page<User>> {
        let db = self.base.db();

        let total = user::Entity::find().count(db).await?;

        let column = Self::sort_column(&page);
        let mut query = match page.direction() {
            SortDirection::Asc => user::Entity::find().order_by_asc(column),
            SortDirection::Desc => user::Entity::find().order_by_desc(column),
        };
        // Stable ordering when sorting on a non-unique column
        query = query.order_by_asc(user::Column::Id);

        let models = query
            .offset(page.offset())
            .limit(page.size())
            .all(db)
            .await?;

        let role_models = models
            .load_many_to_many(role::Entity, user_role::Entity, db)
            .await?;

        let content = models
            .into_iter()
            .zip(role_models)
            .map(|(model, roles)| to_user(model, roles.into_iter().map(|r| r.into()).collect()))
            .collect();

        Ok(Page::new(content, page.page(), page.size(), total))
    }

    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let new_email = input.email.clone();
        let active_model = user::ActiveModel {
            id: Set(model.id),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            password: Set(model.password),
        };

        let updated = self.base.update(active_model).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                UserError::EmailConflict(new_email)
            } else {
                UserError::Database(e)
            }
        })?;

        let roles = updated
            .find_related(role::Entity)
            .all(self.base.db())
            .await?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(to_user(
            updated,
            roles.into_iter().map(|r| r.into()).collect(),
        ))
    }

    async fn delete(&self, id: i64) -> UserResult<bool> {
        // Join rows go with the user (ON DELETE CASCADE)
        match self.base.delete_by_id(id).await {
            Ok(rows_affected) => {
                if rows_affected > 0 {
                    tracing::info!(user_id = %id, "Deleted user");
                }
                Ok(rows_affected > 0)
            }
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "User delete rejected");
                Err(UserError::DeleteConflict(id))
            }
        }
    }
}
