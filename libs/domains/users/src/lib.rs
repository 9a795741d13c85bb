//! Users Domain
//!
//! Users and their role assignments. Emails are unique: a service-level
//! validation gate produces the friendly field error, while the
//! database unique index stays authoritative for races. Passwords are
//! argon2-hashed before they reach the store and never serialized
//! outward.
//!
//! Roles form a closed, migration-seeded set; they are attached to
//! users at creation and have no mutation surface of their own.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{CreateUser, Role, RoleResponse, UpdateUser, User, UserResponse};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
