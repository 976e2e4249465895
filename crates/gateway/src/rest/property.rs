//! Property REST endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rentora_config::MediaConfig;
use rentora_database::{NewProperty, Price, Property, UpdatePropertyRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{GatewayError, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

/// Public listing projection: exactly the five listing fields, nothing
/// else. Descriptions, room counts, landlord identity and timestamps never
/// appear here.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub price_per_night: String,
    pub category: String,
    pub image_url: Option<String>,
}

impl ListingResponse {
    pub fn project(property: &Property, media: &MediaConfig) -> Self {
        Self {
            id: property.id.clone(),
            title: property.title.clone(),
            price_per_night: property.price_per_night.to_string(),
            category: property.category.clone(),
            image_url: property.image_url(media),
        }
    }
}

/// Full property detail, landlord-facing and for detail pages.
#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_per_night: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub max_guests: i64,
    pub country: String,
    pub city: String,
    pub category: String,
    pub image_url: Option<String>,
    pub landlord_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl PropertyResponse {
    pub fn from_property(property: &Property, media: &MediaConfig) -> Self {
        Self {
            id: property.id.clone(),
            title: property.title.clone(),
            description: property.description.clone(),
            price_per_night: property.price_per_night.to_string(),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            max_guests: property.max_guests,
            country: property.country.clone(),
            city: property.city.clone(),
            category: property.category.clone(),
            image_url: property.image_url(media),
            landlord_id: property.landlord_id.clone(),
            created_at: property.created_at.clone(),
            updated_at: property.updated_at.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: String,
    /// Decimal string with up to two fractional digits, e.g. "480.00".
    pub price_per_night: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub max_guests: i64,
    pub country: String,
    pub city: String,
    pub category: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct UpdatePropertyBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<String>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub max_guests: Option<i64>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

fn parse_price(raw: &str) -> GatewayResult<Price> {
    raw.parse().map_err(|_| {
        GatewayError::validation(
            "price_per_night",
            "Enter a valid price with up to two decimal places.",
        )
    })
}

#[utoipa::path(
    get,
    path = "/properties/",
    tag = "Properties",
    responses(
        (status = 200, description = "Listing projections, newest first", body = Vec<ListingResponse>)
    )
)]
pub async fn list_properties(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<ListingResponse>>> {
    let properties = state.properties().list().await?;

    let listings = properties
        .iter()
        .map(|property| ListingResponse::project(property, state.media()))
        .collect();

    Ok(Json(listings))
}

#[utoipa::path(
    post,
    path = "/properties/",
    tag = "Properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Property created", body = PropertyResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_property(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePropertyRequest>,
) -> GatewayResult<impl IntoResponse> {
    let price_per_night = parse_price(&payload.price_per_night)?;

    let property = state
        .properties()
        .create(&NewProperty {
            title: payload.title,
            description: payload.description,
            price_per_night,
            bedrooms: payload.bedrooms,
            bathrooms: payload.bathrooms,
            max_guests: payload.max_guests,
            country: payload.country,
            city: payload.city,
            category: payload.category,
            image: payload.image,
            landlord_id: user.id,
        })
        .await?;

    let response = PropertyResponse::from_property(&property, state.media());
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/properties/{property_id}/",
    tag = "Properties",
    params(("property_id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property detail", body = PropertyResponse),
        (status = 404, description = "Property not found")
    )
)]
pub async fn get_property(
    State(state): State<Arc<GatewayState>>,
    Path(property_id): Path<String>,
) -> GatewayResult<Json<PropertyResponse>> {
    let property = state
        .properties()
        .find_by_id(&property_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Property not found".to_string()))?;

    Ok(Json(PropertyResponse::from_property(
        &property,
        state.media(),
    )))
}

#[utoipa::path(
    put,
    path = "/properties/{property_id}/",
    tag = "Properties",
    params(("property_id" = String, Path, description = "Property id")),
    request_body = UpdatePropertyBody,
    responses(
        (status = 200, description = "Property updated", body = PropertyResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the landlord"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn update_property(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<String>,
    Json(payload): Json<UpdatePropertyBody>,
) -> GatewayResult<Json<PropertyResponse>> {
    let existing = state
        .properties()
        .find_by_id(&property_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Property not found".to_string()))?;

    if existing.landlord_id != user.id {
        return Err(GatewayError::Forbidden(
            "Only the landlord can modify this property".to_string(),
        ));
    }

    let price_per_night = payload
        .price_per_night
        .as_deref()
        .map(parse_price)
        .transpose()?;

    let property = state
        .properties()
        .update(
            &property_id,
            &UpdatePropertyRequest {
                title: payload.title,
                description: payload.description,
                price_per_night,
                bedrooms: payload.bedrooms,
                bathrooms: payload.bathrooms,
                max_guests: payload.max_guests,
                country: payload.country,
                city: payload.city,
                category: payload.category,
                image: payload.image,
            },
        )
        .await?;

    Ok(Json(PropertyResponse::from_property(
        &property,
        state.media(),
    )))
}

#[utoipa::path(
    delete,
    path = "/properties/{property_id}/",
    tag = "Properties",
    params(("property_id" = String, Path, description = "Property id")),
    responses(
        (status = 204, description = "Property deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the landlord"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn delete_property(
    State(state): State<Arc<GatewayState>>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<String>,
) -> GatewayResult<StatusCode> {
    let existing = state
        .properties()
        .find_by_id(&property_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Property not found".to_string()))?;

    if existing.landlord_id != user.id {
        return Err(GatewayError::Forbidden(
            "Only the landlord can delete this property".to_string(),
        ));
    }

    state.properties().delete(&property_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
