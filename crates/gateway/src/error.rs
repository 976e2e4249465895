//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rentora_auth::AuthError;
use rentora_database::{PropertyError, UserError};
use serde_json::json;
use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Invalid input attributable to a single field; rendered as a
    /// field-keyed body (`{"email": ["..."]}`).
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation { .. } => StatusCode::BAD_REQUEST,
            GatewayError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::DatabaseError(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            GatewayError::Validation { field, message } => {
                let mut fields = serde_json::Map::new();
                fields.insert(field.clone(), json!([message]));
                serde_json::Value::Object(fields)
            }
            other => json!({
                "error": status.as_str(),
                "message": other.to_string(),
            }),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<AuthError> for GatewayError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Validation { field, message } => GatewayError::Validation {
                field: field.to_string(),
                message,
            },
            AuthError::InvalidCredentials => {
                GatewayError::AuthenticationFailed("Invalid credentials".to_string())
            }
            AuthError::InvalidToken => {
                GatewayError::AuthenticationFailed("Token is invalid or expired".to_string())
            }
            AuthError::UserNotFound => GatewayError::NotFound("User not found".to_string()),
            AuthError::TokenCreation => {
                GatewayError::InternalError("Failed to issue token".to_string())
            }
            AuthError::Database(e) => GatewayError::DatabaseError(e.to_string()),
            AuthError::Repository(e) => GatewayError::DatabaseError(e.to_string()),
            AuthError::PasswordHash(e) => GatewayError::InternalError(e.to_string()),
        }
    }
}

impl From<UserError> for GatewayError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::UserNotFound => GatewayError::NotFound("User not found".to_string()),
            UserError::EmailAlreadyExists => GatewayError::validation(
                "email",
                "A user is already registered with this e-mail address.",
            ),
            UserError::UsernameAlreadyExists => {
                GatewayError::validation("username", "This username is already taken.")
            }
            UserError::DatabaseError(msg) => GatewayError::DatabaseError(msg),
        }
    }
}

impl From<PropertyError> for GatewayError {
    fn from(error: PropertyError) -> Self {
        match error {
            PropertyError::PropertyNotFound => {
                GatewayError::NotFound("Property not found".to_string())
            }
            PropertyError::LandlordNotFound => {
                GatewayError::InvalidRequest("Landlord does not exist".to_string())
            }
            PropertyError::DatabaseError(msg) => GatewayError::DatabaseError(msg),
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(error: sqlx::Error) -> Self {
        GatewayError::DatabaseError(error.to_string())
    }
}
