//! Authentication for the Rentora backend: the registration contract,
//! password credentials (argon2) and JWT issuance/validation.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::Utc;
use rentora_config::AuthConfig;
use rentora_database::entities::user::generate_username;
use rentora_database::{User, UserRepository};
use sqlx::{Row, SqlitePool, Transaction};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub mod registration;
pub mod tokens;

pub use registration::{
    BaseRegistrationValidator, PasswordRegistrationValidator, RegisterAttrs,
    RegistrationContract, ValidatedRegistration,
};
pub use tokens::{Claims, TokenIssuer, TokenPair};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token is invalid or expired")]
    InvalidToken,
    #[error("failed to create token")]
    TokenCreation,
    #[error("user not found")]
    UserNotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Repository(#[from] rentora_database::UserError),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
}

impl AuthError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Registration, login and token verification over the user store.
#[derive(Clone)]
pub struct Authenticator {
    pool: SqlitePool,
    users: UserRepository,
    tokens: TokenIssuer,
    registration: RegistrationContract,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            tokens: TokenIssuer::new(config),
            registration: RegistrationContract::new(),
            pool,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new account from a raw payload.
    ///
    /// Runs the registration contract, then persists the user: insert with
    /// an auto-assigned username, set the display name from validated data.
    /// Both writes run in one transaction so a failure cannot strand a user
    /// without a name.
    pub async fn register(&self, attrs: RegisterAttrs) -> Result<(User, TokenPair), AuthError> {
        let validated = self.registration.validate(attrs)?;

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT id FROM users WHERE email = ?")
            .bind(&validated.email)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(AuthError::validation(
                "email",
                "A user is already registered with this e-mail address.",
            ));
        }

        let password_hash = self.hash_password(&validated.password)?;
        let user = insert_user(&mut tx, &validated.email, &password_hash).await?;
        let user = set_name(&mut tx, user, &validated.name).await?;

        tx.commit().await?;

        let pair = self.tokens.issue_pair(&user.id)?;
        info!(user = %user.id, email = %user.email, "registered new user");
        Ok((user, pair))
    }

    /// Verify e-mail + password and issue a token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let row = sqlx::query("SELECT id, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AuthError::InvalidCredentials);
        };

        let stored: String = row.try_get("password_hash")?;
        let parsed = PasswordHash::new(&stored).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let id: String = row.try_get("id")?;
        let user = self
            .users
            .find_by_id(&id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let pair = self.tokens.issue_pair(&user.id)?;
        info!(user = %user.id, "user logged in");
        Ok((user, pair))
    }

    /// Exchange a refresh token for a new access token.
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        self.tokens.refresh_access(refresh_token)
    }

    /// Resolve a bearer access token to its user.
    pub async fn authenticate_token(&self, access_token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify_access(access_token)?;
        self.users
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    fn hash_password(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }
}

async fn insert_user(
    tx: &mut Transaction<'_, sqlx::Sqlite>,
    email: &str,
    password_hash: &str,
) -> Result<User, AuthError> {
    let now = Utc::now().to_rfc3339();
    let id = Uuid::new_v4().to_string();
    let username = generate_username();

    sqlx::query(
        "INSERT INTO users (id, email, username, name, password_hash, avatar, created_at, updated_at) VALUES (?, ?, ?, '', ?, NULL, ?, ?)",
    )
    .bind(&id)
    .bind(email)
    .bind(&username)
    .bind(password_hash)
    .bind(&now)
    .bind(&now)
    .execute(&mut **tx)
    .await?;

    Ok(User {
        id,
        email: email.to_string(),
        username,
        name: String::new(),
        avatar: None,
        created_at: now.clone(),
        updated_at: now,
    })
}

async fn set_name(
    tx: &mut Transaction<'_, sqlx::Sqlite>,
    mut user: User,
    name: &str,
) -> Result<User, AuthError> {
    let now = Utc::now().to_rfc3339();

    sqlx::query("UPDATE users SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(&now)
        .bind(&user.id)
        .execute(&mut **tx)
        .await?;

    user.name = name.to_string();
    user.updated_at = now;
    Ok(user)
}
