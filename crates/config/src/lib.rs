use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "rentora.toml",
    "config/rentora.toml",
    "crates/config/rentora.toml",
    "../rentora.toml",
    "../config/rentora.toml",
    "../crates/config/rentora.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty list means any origin (development).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://rentora.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Token issuance settings. Access tokens are short-lived; refresh tokens
/// are exchanged for new access tokens without rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub secret_key: String,
    #[serde(default = "AuthConfig::default_access_ttl")]
    pub access_token_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_refresh_ttl")]
    pub refresh_token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: "insecure-dev-secret-change-me".to_string(),
            access_token_ttl_seconds: Self::default_access_ttl(),
            refresh_token_ttl_seconds: Self::default_refresh_ttl(),
        }
    }
}

impl AuthConfig {
    const fn default_access_ttl() -> u64 {
        3_600
    }

    const fn default_refresh_ttl() -> u64 {
        86_400
    }
}

/// Where media path references resolve to. Image and avatar columns hold
/// paths relative to the media root (`uploads/properties/...`); clients
/// receive them joined onto `website_url` + `media_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "MediaConfig::default_website_url")]
    pub website_url: String,
    #[serde(default = "MediaConfig::default_media_url")]
    pub media_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            website_url: Self::default_website_url(),
            media_url: Self::default_media_url(),
        }
    }
}

impl MediaConfig {
    fn default_website_url() -> String {
        "http://localhost:8000".to_string()
    }

    fn default_media_url() -> String {
        "/media/".to_string()
    }

    /// Resolve a stored relative media path to an absolute URL.
    pub fn resolve(&self, relative_path: &str) -> String {
        format!("{}{}{}", self.website_url, self.media_url, relative_path)
    }
}

/// Load the application configuration by combining defaults, an optional
/// config file, and `RENTORA__*` environment overrides.
///
/// ```
/// use rentora_config::load;
///
/// std::env::remove_var("RENTORA_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// assert_eq!(config.auth.access_token_ttl_seconds, 3_600);
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default("http.allowed_origins", defaults.http.allowed_origins.clone())
        .unwrap()
        .set_default("database.url", defaults.database.url.clone())
        .unwrap()
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )
        .unwrap()
        .set_default("auth.secret_key", defaults.auth.secret_key.clone())
        .unwrap()
        .set_default(
            "auth.access_token_ttl_seconds",
            i64::try_from(defaults.auth.access_token_ttl_seconds).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default(
            "auth.refresh_token_ttl_seconds",
            i64::try_from(defaults.auth.refresh_token_ttl_seconds).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default("media.website_url", defaults.media.website_url.clone())
        .unwrap()
        .set_default("media.media_url", defaults.media.media_url.clone())
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("RENTORA").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("RENTORA_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via RENTORA_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
