use async_trait::async_trait;
use axum_helpers::{FieldMessage, Page, PageRequest, SortDirection};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, Role, UpdateUser, User};

/// Field error emitted for a duplicate email, shared by the gate and
/// the unique-violation remap so both paths produce the same body.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "email already exists";

/// Repository trait for User persistence
///
/// `create` expects the password field to already hold the argon2
/// hash; hashing is the service's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user with their role assignments
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Get a user by ID with hydrated roles
    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>>;

    /// Look up a user by exact email
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List users, paginated and sorted
    async fn list(&self, page: PageRequest) -> UserResult<Page<User>>;

    /// Update names and email; password and roles are untouched
    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User>;

    /// Delete a user by ID, returning whether a row was removed
    async fn delete(&self, id: i64) -> UserResult<bool>;
}

/// Collapse duplicate ids while keeping first-seen order
pub(crate) fn distinct_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn duplicate_email_error() -> UserError {
    UserError::Validation(vec![FieldMessage::new("email", DUPLICATE_EMAIL_MESSAGE)])
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Role resolution checks against a fixed set supplied at construction,
/// standing in for the seeded `tb_role` rows.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    roles: Arc<HashMap<i64, Role>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_roles(Vec::new())
    }

    /// Build a repository that resolves role ids against `roles`
    pub fn with_roles(roles: Vec<Role>) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            roles: Arc::new(roles.into_iter().map(|r| (r.id, r)).collect()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn resolve_roles(&self, ids: &[i64]) -> UserResult<Vec<Role>> {
        distinct_ids(ids)
            .into_iter()
            .map(|id| {
                self.roles
                    .get(&id)
                    .cloned()
                    .ok_or(UserError::UnknownRole(id))
            })
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let roles = self.resolve_roles(&input.role_ids)?;
        let mut users = self.users.write().await;

        // Stand-in for the unique index on tb_user.email
        if users.values().any(|u| u.email == input.email) {
            return Err(duplicate_email_error());
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password: input.password,
            roles,
        };
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, page: PageRequest) -> UserResult<Page<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();

        match page.sort() {
            "first_name" => {
                result.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.id.cmp(&b.id)))
            }
            "email" => result.sort_by(|a, b| a.email.cmp(&b.email).then(a.id.cmp(&b.id))),
            _ => result.sort_by_key(|u| u.id),
        }
        if page.direction() == SortDirection::Desc {
            result.reverse();
        }

        let total = result.len() as u64;
        let content: Vec<User> = result
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size() as usize)
            .collect();

        Ok(Page::new(content, page.page(), page.size(), total))
    }

    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.id != id && u.email == input.email)
        {
            return Err(UserError::EmailConflict(input.email));
        }

        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.email = input.email;
        let updated = user.clone();

        tracing::info!(user_id = %id, "Updated user");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
