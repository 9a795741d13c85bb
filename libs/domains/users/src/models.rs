use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Role attached to a user. The role set is closed and seeded by
/// migration (`ROLE_OPERATOR`, `ROLE_ADMIN`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: i64,
    pub authority: String,
}

/// Role projection embedded in user responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: i64,
    pub authority: String,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            authority: role.authority,
        }
    }
}

/// User domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: Vec<Role>,
}

/// User projection returned by the API; carries no password field at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<RoleResponse>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            roles: user.roles.into_iter().map(RoleResponse::from).collect(),
        }
    }
}

/// DTO for creating a new user
///
/// The service hashes `password` before this reaches a repository.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100, message = "first name must not be blank"))]
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "email must be well-formed"), length(max = 255))]
    pub email: String,
    pub password: String,
    /// Role ids to attach; duplicates are collapsed
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

/// DTO for updating an existing user
///
/// Only names and email can change; password and roles are untouched.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100, message = "first name must not be blank"))]
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "email must be well-formed"), length(max = 255))]
    pub email: String,
}
