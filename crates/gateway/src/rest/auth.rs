//! Authentication REST endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rentora_auth::{RegisterAttrs, TokenPair};
use rentora_config::MediaConfig;
use rentora_database::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::GatewayResult;
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

/// Raw registration payload. Fields are optional so that missing values
/// come back as field-keyed validation errors; a legacy `username` value is
/// accepted and discarded by the registration contract.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
}

impl From<RegisterRequest> for RegisterAttrs {
    fn from(request: RegisterRequest) -> Self {
        RegisterAttrs {
            email: request.email,
            password1: request.password1,
            password2: request.password2,
            name: request.name,
            username: request.username,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl UserResponse {
    pub fn from_user(user: &User, media: &MediaConfig) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url(media),
        }
    }
}

/// Token pair plus the user record, returned on registration and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthTokensResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserResponse,
}

impl AuthTokensResponse {
    pub fn new(pair: TokenPair, user: &User, media: &MediaConfig) -> Self {
        Self {
            access: pair.access,
            refresh: pair.refresh,
            user: UserResponse::from_user(user, media),
        }
    }
}

#[utoipa::path(
    post,
    path = "/register/",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthTokensResponse),
        (status = 400, description = "Validation failed, field-keyed body")
    )
)]
pub async fn register(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<RegisterRequest>,
) -> GatewayResult<impl IntoResponse> {
    let (user, pair) = state.authenticator().register(payload.into()).await?;

    let response = AuthTokensResponse::new(pair, &user, state.media());
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/login/",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = AuthTokensResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<LoginRequest>,
) -> GatewayResult<Json<AuthTokensResponse>> {
    let (user, pair) = state
        .authenticator()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthTokensResponse::new(pair, &user, state.media())))
}

#[utoipa::path(
    post,
    path = "/logout/",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn logout(CurrentUser(user): CurrentUser) -> Json<LogoutResponse> {
    // Tokens are not blacklisted; invalidation is client-side discard.
    tracing::info!(user = %user.id, "user logged out");
    Json(LogoutResponse {
        detail: "Successfully logged out.".to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/token/refresh/",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn token_refresh(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<RefreshRequest>,
) -> GatewayResult<Json<RefreshResponse>> {
    let access = state
        .authenticator()
        .refresh_access_token(&payload.refresh)?;

    Ok(Json(RefreshResponse { access }))
}

#[utoipa::path(
    get,
    path = "/me/",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
) -> Json<UserResponse> {
    Json(UserResponse::from_user(&user, state.media()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_resolves_avatar_url() {
        let media = MediaConfig::default();
        let user = User {
            id: "id-1".to_string(),
            email: "ann@example.com".to_string(),
            username: "user_abc123def456".to_string(),
            name: "Ann".to_string(),
            avatar: Some("uploads/avatars/ann.png".to_string()),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };

        let response = UserResponse::from_user(&user, &media);
        assert_eq!(
            response.avatar_url.as_deref(),
            Some("http://localhost:8000/media/uploads/avatars/ann.png")
        );
    }
}
