//! Shared application state for the gateway

use rentora_auth::Authenticator;
use rentora_config::{AppConfig, MediaConfig};
use rentora_database::{PropertyRepository, UserRepository};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state containing configuration and services
#[derive(Clone)]
pub struct GatewayState {
    pool: SqlitePool,
    config: Arc<AppConfig>,
    authenticator: Authenticator,
    users: UserRepository,
    properties: PropertyRepository,
}

impl GatewayState {
    /// Create a new gateway state over an initialized database pool
    pub fn new(pool: SqlitePool, config: Arc<AppConfig>) -> Self {
        let authenticator = Authenticator::new(pool.clone(), &config.auth);
        let users = UserRepository::new(pool.clone());
        let properties = PropertyRepository::new(pool.clone());

        Self {
            pool,
            config,
            authenticator,
            users,
            properties,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn media(&self) -> &MediaConfig {
        &self.config.media
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn properties(&self) -> &PropertyRepository {
        &self.properties
    }
}
