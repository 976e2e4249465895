//! JWT issuance and validation.
//!
//! Access tokens are short-lived; refresh tokens can be exchanged for new
//! access tokens without being rotated. Nothing is blacklisted: discard is
//! client-side. Signing is HS512 with the configured secret.

use crate::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rentora_config::AuthConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
    pub token_type: String,
}

/// Access/refresh token pair issued at registration and login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// JWT issuer/validator bound to the configured secret and lifetimes.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret_key.as_ref()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_ref()),
            access_ttl: Duration::seconds(config.access_token_ttl_seconds as i64),
            refresh_ttl: Duration::seconds(config.refresh_token_ttl_seconds as i64),
        }
    }

    /// Issue a fresh access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue(user_id, TOKEN_TYPE_ACCESS, self.access_ttl)?,
            refresh: self.issue(user_id, TOKEN_TYPE_REFRESH, self.refresh_ttl)?,
        })
    }

    /// Validate an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TOKEN_TYPE_ACCESS)
    }

    /// Validate a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TOKEN_TYPE_REFRESH)
    }

    /// Exchange a refresh token for a new access token. The refresh token
    /// itself is not rotated.
    pub fn refresh_access(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.verify_refresh(refresh_token)?;
        self.issue(&claims.sub, TOKEN_TYPE_ACCESS, self.access_ttl)
    }

    fn issue(&self, user_id: &str, token_type: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenCreation)
    }

    fn verify(&self, token: &str, expected_type: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        if data.claims.token_type != expected_type {
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }
}
