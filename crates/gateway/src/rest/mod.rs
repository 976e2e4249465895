//! REST API endpoints for the gateway

pub mod auth;
pub mod health;
pub mod property;

use crate::state::GatewayState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Create all REST API routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        // Authentication routes
        .route("/register/", post(auth::register))
        .route("/login/", post(auth::login))
        .route("/logout/", post(auth::logout))
        .route("/token/refresh/", post(auth::token_refresh))
        .route("/me/", get(auth::me))
        // Property routes
        .route(
            "/properties/",
            get(property::list_properties).post(property::create_property),
        )
        .route(
            "/properties/:property_id/",
            get(property::get_property)
                .put(property::update_property)
                .delete(property::delete_property),
        )
        // Health route
        .route("/health", get(health::health_check))
}
