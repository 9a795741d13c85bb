use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::{FieldMessage, Page, PageRequest};
use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, UserResponse};
use crate::repository::{DUPLICATE_EMAIL_MESSAGE, UserRepository};

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List users, paginated
    pub async fn find_all_paged(&self, page: PageRequest) -> UserResult<Page<UserResponse>> {
        let users = self.repository.list(page).await?;
        Ok(users.map(UserResponse::from))
    }

    /// Get a user by ID
    pub async fn find_by_id(&self, id: i64) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// Create a new user
    ///
    /// Runs the validation gate before any row is written, hashes the
    /// password, then inserts the user with their role assignments in
    /// one transaction.
    pub async fn insert(&self, input: CreateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::InvalidInput(e.to_string()))?;

        let messages = self.validate_new_user(&input).await?;
        if !messages.is_empty() {
            return Err(UserError::Validation(messages));
        }

        let mut input = input;
        input.password = self.hash_password(&input.password)?;

        let created = self.repository.create(input).await?;
        Ok(created.into())
    }

    /// Update a user's names and email; password and roles never change
    /// through this path
    pub async fn update(&self, id: i64, input: UpdateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::InvalidInput(e.to_string()))?;

        let updated = self.repository.update(id, input).await?;
        Ok(updated.into())
    }

    /// Delete a user
    pub async fn delete(&self, id: i64) -> UserResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    /// Validation gate for new users: accumulates field errors for the
    /// candidate payload. Currently the only rule is email uniqueness;
    /// the store's unique index remains authoritative for races.
    pub async fn validate_new_user(&self, input: &CreateUser) -> UserResult<Vec<FieldMessage>> {
        let mut messages = Vec::new();

        if self.repository.find_by_email(&input.email).await?.is_some() {
            messages.push(FieldMessage::new("email", DUPLICATE_EMAIL_MESSAGE));
        }

        Ok(messages)
    }

    /// Check a plaintext password against a stored hash (for external
    /// authentication collaborators)
    pub fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn sample_user(id: i64, email: &str) -> User {
        User {
            id,
            first_name: "Alex".to_string(),
            last_name: "Brown".to_string(),
            email: email.to_string(),
            password: "$argon2id$fake".to_string(),
            roles: vec![Role {
                id: 1,
                authority: "ROLE_OPERATOR".to_string(),
            }],
        }
    }

    fn create_input(email: &str) -> CreateUser {
        CreateUser {
            first_name: "Alex".to_string(),
            last_name: "Brown".to_string(),
            email: email.to_string(),
            password: "s3cr3t-pass".to_string(),
            role_ids: vec![1],
        }
    }

    #[tokio::test]
    async fn test_gate_rejects_duplicate_email_with_single_field_error() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .returning(|email| Ok(Some(sample_user(1, email))));
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let result = service.insert(create_input("taken@example.com")).await;

        match result {
            Err(UserError::Validation(messages)) => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].field, "email");
                assert_eq!(messages[0].message, DUPLICATE_EMAIL_MESSAGE);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insert_hashes_password_before_store() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo.expect_find_by_email().returning(|_| Ok(None));
        mock_repo.expect_create().returning(|input| {
            // The service must never hand the repository a plaintext
            // password
            assert_ne!(input.password, "s3cr3t-pass");
            assert!(input.password.starts_with("$argon2"));
            let mut user = sample_user(1, &input.email);
            user.password = input.password;
            Ok(user)
        });

        let service = UserService::new(mock_repo);
        let response = service.insert(create_input("new@example.com")).await.unwrap();

        assert_eq!(response.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_insert_rejects_malformed_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_email().never();
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let result = service.insert(create_input("not-an-email")).await;

        assert!(matches!(result, Err(UserError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unknown_role_propagates() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo.expect_find_by_email().returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .returning(|_| Err(UserError::UnknownRole(9)));

        let service = UserService::new(mock_repo);
        let result = service.insert(create_input("new@example.com")).await;

        assert!(matches!(result, Err(UserError::UnknownRole(9))));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_maps_to_not_found() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo.expect_get_by_id().with(eq(42)).returning(|_| Ok(None));

        let service = UserService::new(mock_repo);
        let result = service.find_by_id(42).await;

        assert!(matches!(result, Err(UserError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_delete_missing_maps_to_not_found() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo.expect_delete().with(eq(7)).returning(|_| Ok(false));

        let service = UserService::new(mock_repo);
        let result = service.delete(7).await;

        assert!(matches!(result, Err(UserError::NotFound(7))));
    }

    #[tokio::test]
    async fn test_password_hash_roundtrip() {
        let service = UserService::new(MockUserRepository::new());

        let hash = service.hash_password("correct horse").unwrap();
        assert!(service.verify_password("correct horse", &hash).unwrap());
        assert!(!service.verify_password("wrong horse", &hash).unwrap());
    }
}
