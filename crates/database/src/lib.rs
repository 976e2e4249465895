//! Rentora database crate
//!
//! Persistence layer for the listing backend: connection management,
//! embedded migrations, entities and repository implementations.

use rentora_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;

pub use repos::{PropertyRepository, UserRepository};

pub use entities::{
    property::{NewProperty, Price, Property, UpdatePropertyRequest},
    user::{NewUser, User},
};

pub use types::{
    errors::{DatabaseError, PropertyError, UserError},
    DatabaseResult, PropertyResult, UserResult,
};

/// Re-export commonly used types for convenience
pub use sqlx::Pool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}
