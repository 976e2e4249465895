//! User repository for database operations.

use crate::entities::user::{NewUser, User};
use crate::types::{UserError, UserResult};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, username, name, avatar, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create new user
    pub async fn create(&self, request: &NewUser) -> UserResult<User> {
        let now = Utc::now().to_rfc3339();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO users (id, email, username, name, password_hash, avatar, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.email)
        .bind(&request.username)
        .bind(&request.name)
        .bind(&request.password_hash)
        .bind(&request.avatar)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(User {
            id,
            email: request.email.clone(),
            username: request.username.clone(),
            name: request.name.clone(),
            avatar: request.avatar.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(row.map(row_to_user))
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(row.map(row_to_user))
    }

    /// Check if email exists
    pub async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }

    /// Delete user. Owned properties go with it via the landlord cascade.
    pub async fn delete(&self, id: &str) -> UserResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::UserNotFound);
        }

        Ok(())
    }

    /// Get user count
    pub async fn count(&self) -> UserResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))
    }
}

fn row_to_user(row: sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        name: row.get("name"),
        avatar: row.get("avatar"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_unique_violation(e: sqlx::Error) -> UserError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        if message.contains("users.email") {
            UserError::EmailAlreadyExists
        } else {
            UserError::UsernameAlreadyExists
        }
    } else {
        UserError::DatabaseError(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::generate_username;
    use crate::migrations::MIGRATOR;
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let options = sqlx::sqlite::SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        MIGRATOR.run(&pool).await.unwrap();

        (pool, temp_dir)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: generate_username(),
            name: "Test User".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_user_creation_and_retrieval() {
        let (pool, _tmp) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let created = repo.create(&new_user("test@example.com")).await.unwrap();
        assert_eq!(created.email, "test@example.com");

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.email, created.email);
        assert_eq!(found.username, created.username);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (pool, _tmp) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        repo.create(&new_user("dup@example.com")).await.unwrap();
        let err = repo
            .create(&new_user("dup@example.com"))
            .await
            .expect_err("duplicate email should fail");

        assert!(matches!(err, UserError::EmailAlreadyExists));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_exists() {
        let (pool, _tmp) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        assert!(!repo.email_exists("test@example.com").await.unwrap());
        repo.create(&new_user("test@example.com")).await.unwrap();
        assert!(repo.email_exists("test@example.com").await.unwrap());
        assert!(!repo.email_exists("other@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_user_reports_not_found() {
        let (pool, _tmp) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let err = repo.delete("no-such-id").await.expect_err("should fail");
        assert!(matches!(err, UserError::UserNotFound));
    }
}
