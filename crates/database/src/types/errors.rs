//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// User-specific database errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Property-specific database errors
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("Property not found")]
    PropertyNotFound,

    #[error("Landlord not found")]
    LandlordNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
