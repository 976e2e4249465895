//! Authentication extraction and request logging

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::IntoResponse,
};
use rentora_database::User;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::state::GatewayState;

/// The authenticated user behind a bearer access token. Handlers that take
/// this extractor reject the request with 401 when the token is missing or
/// invalid.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<GatewayState>> for CurrentUser {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            GatewayError::AuthenticationFailed("Missing authentication token".to_string())
        })?;

        let user = state.authenticator().authenticate_token(token).await?;
        Ok(CurrentUser(user))
    }
}

/// Extract the token from an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.trim().is_empty())
}

/// Logging middleware for request/response logging
pub async fn logging_middleware(request: Request, next: Next) -> impl IntoResponse {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts_with_authorization(value: Option<&str>) -> Parts {
        let mut builder = HttpRequest::builder().uri("/properties/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn bearer_token_is_extracted_from_header() {
        let parts = parts_with_authorization(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_malformed_headers_yield_none() {
        assert_eq!(bearer_token(&parts_with_authorization(None)), None);
        assert_eq!(
            bearer_token(&parts_with_authorization(Some("Token abc"))),
            None
        );
        assert_eq!(bearer_token(&parts_with_authorization(Some("Bearer "))), None);
    }
}
