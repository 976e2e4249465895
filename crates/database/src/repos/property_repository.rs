//! Property repository for database operations.

use crate::entities::property::{NewProperty, Price, Property, UpdatePropertyRequest};
use crate::types::{PropertyError, PropertyResult};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const PROPERTY_COLUMNS: &str = "id, title, description, price_per_night_cents, bedrooms, bathrooms, max_guests, country, city, category, image, landlord_id, created_at, updated_at";

/// Repository for property database operations
#[derive(Clone)]
pub struct PropertyRepository {
    pool: SqlitePool,
}

impl PropertyRepository {
    /// Create a new property repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create new property
    pub async fn create(&self, request: &NewProperty) -> PropertyResult<Property> {
        let now = Utc::now().to_rfc3339();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO properties (id, title, description, price_per_night_cents, bedrooms, bathrooms, max_guests, country, city, category, image, landlord_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.price_per_night.cents())
        .bind(request.bedrooms)
        .bind(request.bathrooms)
        .bind(request.max_guests)
        .bind(&request.country)
        .bind(&request.city)
        .bind(&request.category)
        .bind(&request.image)
        .bind(&request.landlord_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("FOREIGN KEY constraint failed") {
                PropertyError::LandlordNotFound
            } else {
                PropertyError::DatabaseError(e.to_string())
            }
        })?;

        Ok(Property {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            price_per_night: request.price_per_night,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            max_guests: request.max_guests,
            country: request.country.clone(),
            city: request.city.clone(),
            category: request.category.clone(),
            image: request.image.clone(),
            landlord_id: request.landlord_id.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Find property by ID
    pub async fn find_by_id(&self, id: &str) -> PropertyResult<Option<Property>> {
        let row = sqlx::query(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        Ok(row.map(row_to_property))
    }

    /// List all properties, newest first
    pub async fn list(&self) -> PropertyResult<Vec<Property>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(row_to_property).collect())
    }

    /// List properties owned by a landlord, newest first
    pub async fn list_by_landlord(&self, landlord_id: &str) -> PropertyResult<Vec<Property>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE landlord_id = ? ORDER BY created_at DESC"
        ))
        .bind(landlord_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(row_to_property).collect())
    }

    /// Update property fields; refreshes `updated_at` on every mutation.
    pub async fn update(&self, id: &str, request: &UpdatePropertyRequest) -> PropertyResult<Property> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE properties SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                price_per_night_cents = COALESCE(?, price_per_night_cents),
                bedrooms = COALESCE(?, bedrooms),
                bathrooms = COALESCE(?, bathrooms),
                max_guests = COALESCE(?, max_guests),
                country = COALESCE(?, country),
                city = COALESCE(?, city),
                category = COALESCE(?, category),
                image = COALESCE(?, image),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.price_per_night.map(|p| p.cents()))
        .bind(request.bedrooms)
        .bind(request.bathrooms)
        .bind(request.max_guests)
        .bind(&request.country)
        .bind(&request.city)
        .bind(&request.category)
        .bind(&request.image)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PropertyError::PropertyNotFound);
        }

        self.find_by_id(id)
            .await?
            .ok_or(PropertyError::PropertyNotFound)
    }

    /// Delete property
    pub async fn delete(&self, id: &str) -> PropertyResult<()> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PropertyError::PropertyNotFound);
        }

        Ok(())
    }

    /// Get property count
    pub async fn count(&self) -> PropertyResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PropertyError::DatabaseError(e.to_string()))
    }
}

fn row_to_property(row: sqlx::sqlite::SqliteRow) -> Property {
    Property {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        price_per_night: Price::from_cents(row.get("price_per_night_cents")),
        bedrooms: row.get("bedrooms"),
        bathrooms: row.get("bathrooms"),
        max_guests: row.get("max_guests"),
        country: row.get("country"),
        city: row.get("city"),
        category: row.get("category"),
        image: row.get("image"),
        landlord_id: row.get("landlord_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
