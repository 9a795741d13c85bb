//! PostgreSQL integration tests for the Users domain
//!
//! Requires Docker (testcontainers). Roles come from the migration
//! seed (`ROLE_OPERATOR`, `ROLE_ADMIN`).

use domain_users::entity::role;
use domain_users::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use test_utils::{TestDataBuilder, TestDatabase};

async fn seeded_role_id(db: &TestDatabase, authority: &str) -> i64 {
    role::Entity::find()
        .filter(role::Column::Authority.eq(authority))
        .one(&db.connection())
        .await
        .unwrap()
        .expect("role should be seeded by migration")
        .id
}

fn create_input(email: &str, role_ids: Vec<i64>) -> CreateUser {
    CreateUser {
        first_name: "Alex".to_string(),
        last_name: "Brown".to_string(),
        email: email.to_string(),
        password: "s3cr3t-pass".to_string(),
        role_ids,
    }
}

#[tokio::test]
async fn test_create_user_attaches_seeded_roles() {
    let db = TestDatabase::new().await;
    let operator = seeded_role_id(&db, "ROLE_OPERATOR").await;
    let admin = seeded_role_id(&db, "ROLE_ADMIN").await;

    let builder = TestDataBuilder::from_test_name("user_roles");
    let service = UserService::new(PgUserRepository::new(db.connection()));

    let created = service
        .insert(create_input(&builder.email("alex"), vec![operator, admin]))
        .await
        .unwrap();

    let authorities: Vec<&str> = created
        .roles
        .iter()
        .map(|r| r.authority.as_str())
        .collect();
    assert!(authorities.contains(&"ROLE_OPERATOR"));
    assert!(authorities.contains(&"ROLE_ADMIN"));
}

#[tokio::test]
async fn test_password_is_hashed_at_rest() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("user_hash");

    let repo = PgUserRepository::new(db.connection());
    let service = UserService::new(repo);
    let email = builder.email("alex");

    service.insert(create_input(&email, vec![])).await.unwrap();

    let repo = PgUserRepository::new(db.connection());
    let stored = repo.find_by_email(&email).await.unwrap().unwrap();

    assert_ne!(stored.password, "s3cr3t-pass");
    assert!(service.verify_password("s3cr3t-pass", &stored.password).unwrap());
    assert!(!service.verify_password("wrong-pass", &stored.password).unwrap());
}

#[tokio::test]
async fn test_duplicate_email_insert_yields_field_error() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("user_dup");

    let service = UserService::new(PgUserRepository::new(db.connection()));
    let email = builder.email("alex");

    service.insert(create_input(&email, vec![])).await.unwrap();

    let result = service.insert(create_input(&email, vec![])).await;

    match result {
        Err(UserError::Validation(messages)) => {
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].field, "email");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_role_leaves_no_partial_user() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("user_norole");

    let service = UserService::new(PgUserRepository::new(db.connection()));
    let email = builder.email("alex");

    let result = service.insert(create_input(&email, vec![999_999])).await;
    assert!(matches!(result, Err(UserError::UnknownRole(999_999))));

    let repo = PgUserRepository::new(db.connection());
    assert!(repo.find_by_email(&email).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_to_taken_email_is_a_conflict() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("user_conflict");

    let service = UserService::new(PgUserRepository::new(db.connection()));
    let first_email = builder.email("first");
    let second_email = builder.email("second");

    service
        .insert(create_input(&first_email, vec![]))
        .await
        .unwrap();
    let second = service
        .insert(create_input(&second_email, vec![]))
        .await
        .unwrap();

    let result = service
        .update(
            second.id,
            UpdateUser {
                first_name: "Alex".to_string(),
                last_name: "Brown".to_string(),
                email: first_email,
            },
        )
        .await;

    assert!(matches!(result, Err(UserError::EmailConflict(_))));
}

#[tokio::test]
async fn test_delete_user_cascades_role_links() {
    let db = TestDatabase::new().await;
    let operator = seeded_role_id(&db, "ROLE_OPERATOR").await;
    let builder = TestDataBuilder::from_test_name("user_delete");

    let service = UserService::new(PgUserRepository::new(db.connection()));
    let created = service
        .insert(create_input(&builder.email("alex"), vec![operator]))
        .await
        .unwrap();

    service.delete(created.id).await.unwrap();

    let missing = service.find_by_id(created.id).await;
    assert!(matches!(missing, Err(UserError::NotFound(_))));

    // The seeded role itself must survive the cascade
    assert_eq!(seeded_role_id(&db, "ROLE_OPERATOR").await, operator);
}
