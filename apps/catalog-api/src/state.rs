//! Application state management.

use database::postgres::DatabaseConnection;

/// Shared application state.
///
/// Cloning is cheap: the configuration is small and the database
/// connection is an Arc-backed pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: DatabaseConnection,
}
