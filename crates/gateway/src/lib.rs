//! # Rentora Gateway Crate
//!
//! HTTP API layer for the Rentora listing backend: REST routes for
//! registration/authentication and property listings, CORS, request
//! logging, and error mapping.
//!
//! ## Architecture
//!
//! - **rest**: route handlers and DTOs with OpenAPI annotations
//! - **state**: shared application state (pool, config, services)
//! - **middleware**: bearer-token extraction and request logging
//! - **error**: gateway error type with field-keyed validation bodies

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

pub use error::{GatewayError, GatewayResult};
pub use middleware::CurrentUser;
pub use state::GatewayState;

use axum::http::{header, HeaderValue, Method};
use axum::{middleware as axum_middleware, Router};
use rentora_config::HttpConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let cors = build_cors(&state.config().http);
    let arc_state = Arc::new(state);

    let mut router = Router::new()
        .merge(rest::create_rest_routes().with_state(arc_state))
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    // Swagger UI in debug builds only
    #[cfg(debug_assertions)]
    {
        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::auth::register,
                rest::auth::login,
                rest::auth::logout,
                rest::auth::token_refresh,
                rest::auth::me,
                rest::property::list_properties,
                rest::property::create_property,
                rest::property::get_property,
                rest::property::update_property,
                rest::property::delete_property,
                rest::health::health_check,
            ),
            components(
                schemas(
                    rest::auth::RegisterRequest,
                    rest::auth::LoginRequest,
                    rest::auth::RefreshRequest,
                    rest::auth::RefreshResponse,
                    rest::auth::LogoutResponse,
                    rest::auth::UserResponse,
                    rest::auth::AuthTokensResponse,
                    rest::property::ListingResponse,
                    rest::property::PropertyResponse,
                    rest::property::CreatePropertyRequest,
                    rest::property::UpdatePropertyBody,
                    rest::health::HealthResponse,
                )
            ),
            tags(
                (name = "Auth", description = "Registration and token endpoints"),
                (name = "Properties", description = "Property listings"),
                (name = "Health", description = "Service health"),
            )
        )]
        struct ApiDoc;

        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
}

fn build_cors(http: &HttpConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = http
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if origins.is_empty() {
        // Development fallback: any origin, no credentials.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentora_config::AppConfig;

    #[tokio::test]
    async fn router_builds_with_in_memory_database() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        rentora_database::run_migrations(&pool).await.unwrap();

        let state = GatewayState::new(pool, Arc::new(AppConfig::default()));
        let _router = create_router(state);
    }
}
