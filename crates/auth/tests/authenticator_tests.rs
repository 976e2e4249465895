use rentora_auth::{AuthError, Authenticator, RegisterAttrs};
use rentora_config::AuthConfig;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        secret_key: "integration-test-secret".to_string(),
        access_token_ttl_seconds: 3_600,
        refresh_token_ttl_seconds: 86_400,
    }
}

struct TestContext {
    pool: SqlitePool,
    authenticator: Authenticator,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("auth.sqlite");
        let db_url = format!("sqlite://{}", db_path.display());

        let mut options = SqliteConnectOptions::from_str(&db_url)?;
        options = options.create_if_missing(true);
        options = options.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        let authenticator = Authenticator::new(pool.clone(), &test_auth_config());

        Ok(Self {
            pool,
            authenticator,
            _temp_dir: temp_dir,
        })
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }
}

fn register_attrs(email: &str, password: &str, name: &str) -> RegisterAttrs {
    RegisterAttrs {
        email: Some(email.to_string()),
        password1: Some(password.to_string()),
        password2: Some(password.to_string()),
        name: Some(name.to_string()),
        username: None,
    }
}

#[tokio::test]
async fn register_persists_user_with_name_and_auto_username() -> TestResult {
    let ctx = TestContext::new().await?;

    let mut attrs = register_attrs("a@b.com", "Xx12345!", "Ann");
    attrs.username = Some("evil".to_string());

    let (user, _pair) = ctx.authenticator().register(attrs).await?;

    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.name, "Ann");
    assert_ne!(user.username, "evil");
    assert!(user.username.starts_with("user_"));

    let stored: (String, String) =
        sqlx::query_as("SELECT username, name FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_one(ctx.pool())
            .await?;
    assert_ne!(stored.0, "evil");
    assert_eq!(stored.1, "Ann");

    Ok(())
}

#[tokio::test]
async fn register_hashes_password_with_argon2() -> TestResult {
    let ctx = TestContext::new().await?;

    let (user, _) = ctx
        .authenticator()
        .register(register_attrs("alice@example.com", "Xx12345!", "Alice"))
        .await?;

    let secret: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_one(ctx.pool())
        .await?;

    assert!(secret.starts_with("$argon2"), "secret must be an argon2 hash");
    argon2::password_hash::PasswordHash::new(&secret)?;

    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email_with_field_error() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator()
        .register(register_attrs("alice@example.com", "Xx12345!", "Alice"))
        .await?;

    let err = ctx
        .authenticator()
        .register(register_attrs("alice@example.com", "Other123!", "Imposter"))
        .await
        .expect_err("duplicate email should fail");

    assert!(matches!(err, AuthError::Validation { field: "email", .. }));

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(ctx.pool())
        .await?;
    assert_eq!(user_count, 1, "no additional users should be created");

    Ok(())
}

#[tokio::test]
async fn register_without_name_creates_nothing() -> TestResult {
    let ctx = TestContext::new().await?;

    let mut attrs = register_attrs("alice@example.com", "Xx12345!", "Alice");
    attrs.name = None;

    let err = ctx
        .authenticator()
        .register(attrs)
        .await
        .expect_err("missing name should fail");
    assert!(matches!(err, AuthError::Validation { field: "name", .. }));

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(ctx.pool())
        .await?;
    assert_eq!(user_count, 0, "validation failure must not persist a user");

    Ok(())
}

#[tokio::test]
async fn login_returns_tokens_for_valid_credentials() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator()
        .register(register_attrs("alice@example.com", "Xx12345!", "Alice"))
        .await?;

    let (user, pair) = ctx
        .authenticator()
        .login("alice@example.com", "Xx12345!")
        .await?;
    assert_eq!(user.email, "alice@example.com");

    let resolved = ctx.authenticator().authenticate_token(&pair.access).await?;
    assert_eq!(resolved.id, user.id);

    Ok(())
}

#[tokio::test]
async fn login_rejects_incorrect_password() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator()
        .register(register_attrs("alice@example.com", "Xx12345!", "Alice"))
        .await?;

    let err = ctx
        .authenticator()
        .login("alice@example.com", "wrong-password")
        .await
        .expect_err("expected invalid password");
    assert!(matches!(err, AuthError::InvalidCredentials));

    Ok(())
}

#[tokio::test]
async fn login_rejects_unknown_email() -> TestResult {
    let ctx = TestContext::new().await?;
    let err = ctx
        .authenticator()
        .login("unknown@example.com", "whatever")
        .await
        .expect_err("expected unknown email to fail");
    assert!(matches!(err, AuthError::InvalidCredentials));
    Ok(())
}

#[tokio::test]
async fn refresh_token_yields_new_access_token() -> TestResult {
    let ctx = TestContext::new().await?;
    let (user, pair) = ctx
        .authenticator()
        .register(register_attrs("alice@example.com", "Xx12345!", "Alice"))
        .await?;

    let new_access = ctx.authenticator().refresh_access_token(&pair.refresh)?;
    let resolved = ctx.authenticator().authenticate_token(&new_access).await?;
    assert_eq!(resolved.id, user.id);

    Ok(())
}

#[tokio::test]
async fn access_token_cannot_be_used_as_refresh_token() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, pair) = ctx
        .authenticator()
        .register(register_attrs("alice@example.com", "Xx12345!", "Alice"))
        .await?;

    let err = ctx
        .authenticator()
        .refresh_access_token(&pair.access)
        .expect_err("access token must not refresh");
    assert!(matches!(err, AuthError::InvalidToken));

    Ok(())
}

#[tokio::test]
async fn authenticate_token_rejects_garbage() -> TestResult {
    let ctx = TestContext::new().await?;
    let err = ctx
        .authenticator()
        .authenticate_token("not-a-token")
        .await
        .expect_err("garbage token should fail");
    assert!(matches!(err, AuthError::InvalidToken));
    Ok(())
}

#[tokio::test]
async fn authenticate_token_rejects_token_for_deleted_user() -> TestResult {
    let ctx = TestContext::new().await?;
    let (user, pair) = ctx
        .authenticator()
        .register(register_attrs("alice@example.com", "Xx12345!", "Alice"))
        .await?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user.id)
        .execute(ctx.pool())
        .await?;

    let err = ctx
        .authenticator()
        .authenticate_token(&pair.access)
        .await
        .expect_err("token for a deleted user should fail");
    assert!(matches!(err, AuthError::InvalidToken));

    Ok(())
}
