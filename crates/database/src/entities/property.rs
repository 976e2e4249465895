//! Property entity definitions

use rentora_config::MediaConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nightly price with exactly two fractional digits, stored as integer
/// cents. Serialized to clients as a decimal string ("480.00").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("invalid price: {0}")]
pub struct ParsePriceError(String);

impl FromStr for Price {
    type Err = ParsePriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        if whole.is_empty() || whole.chars().any(|c| !c.is_ascii_digit()) {
            return Err(ParsePriceError(s.to_string()));
        }
        if frac.len() > 2 || frac.chars().any(|c| !c.is_ascii_digit()) {
            return Err(ParsePriceError(s.to_string()));
        }

        let whole: i64 = whole
            .parse()
            .map_err(|_| ParsePriceError(s.to_string()))?;
        let frac_cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| ParsePriceError(s.to_string()))? * 10,
            _ => frac.parse::<i64>().map_err(|_| ParsePriceError(s.to_string()))?,
        };

        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(frac_cents))
            .map(Price)
            .ok_or_else(|| ParsePriceError(s.to_string()))
    }
}

impl Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Listing record owned by a User (the landlord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_per_night: Price,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub max_guests: i64,
    pub country: String,
    pub city: String,
    pub category: String,
    pub image: Option<String>,
    pub landlord_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Property {
    /// Resolve the image path reference to an absolute URL, or `None` when
    /// no image is set.
    pub fn image_url(&self, media: &MediaConfig) -> Option<String> {
        self.image.as_deref().map(|path| media.resolve(path))
    }
}

/// Request for creating a new property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub price_per_night: Price,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub max_guests: i64,
    pub country: String,
    pub city: String,
    pub category: String,
    pub image: Option<String>,
    pub landlord_id: String,
}

/// Request for updating an existing property
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<Price>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub max_guests: Option<i64>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_property(image: Option<&str>) -> Property {
        Property {
            id: "00000000-0000-0000-0000-000000000001".to_string(),
            title: "Seaside villa".to_string(),
            description: "Four walls and a view".to_string(),
            price_per_night: Price::from_cents(48_000),
            bedrooms: 3,
            bathrooms: 2,
            max_guests: 6,
            country: "Portugal".to_string(),
            city: "Lagos".to_string(),
            category: "Beach".to_string(),
            image: image.map(|i| i.to_string()),
            landlord_id: "00000000-0000-0000-0000-000000000002".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn image_url_concatenates_base_media_and_path() {
        let media = MediaConfig::default();
        let property = sample_property(Some("uploads/properties/villa.jpg"));

        assert_eq!(
            property.image_url(&media).as_deref(),
            Some("http://localhost:8000/media/uploads/properties/villa.jpg")
        );
    }

    #[test]
    fn image_url_is_none_without_image() {
        let media = MediaConfig::default();
        let property = sample_property(None);
        assert!(property.image_url(&media).is_none());
    }

    #[test]
    fn price_parses_two_fraction_digits() {
        assert_eq!("123.45".parse::<Price>().unwrap(), Price::from_cents(12_345));
        assert_eq!("123.4".parse::<Price>().unwrap(), Price::from_cents(12_340));
        assert_eq!("123".parse::<Price>().unwrap(), Price::from_cents(12_300));
        assert_eq!("0.05".parse::<Price>().unwrap(), Price::from_cents(5));
    }

    #[test]
    fn price_rejects_malformed_input() {
        assert!("".parse::<Price>().is_err());
        assert!("12.345".parse::<Price>().is_err());
        assert!("-3.00".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
        assert!("12.x".parse::<Price>().is_err());
    }

    #[test]
    fn price_displays_with_two_digits() {
        assert_eq!(Price::from_cents(12_345).to_string(), "123.45");
        assert_eq!(Price::from_cents(48_000).to_string(), "480.00");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn price_round_trips_through_serde() {
        let price: Price = serde_json::from_str("\"480.00\"").unwrap();
        assert_eq!(price, Price::from_cents(48_000));
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"480.00\"");
    }
}
