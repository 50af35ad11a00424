use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use validator::Validate;

use super::columns::{self, BATHROOMS, COORDINATE, MONEY, SCORE};
use crate::error::{FieldErrors, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    EntireHome,
    PrivateRoom,
    SharedRoom,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [
        RoomType::EntireHome,
        RoomType::PrivateRoom,
        RoomType::SharedRoom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::EntireHome => "entire_home",
            RoomType::PrivateRoom => "private_room",
            RoomType::SharedRoom => "shared_room",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::EntireHome => "Entire Home/Apt",
            RoomType::PrivateRoom => "Private Room",
            RoomType::SharedRoom => "Shared Room",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown room type {0:?}")]
pub struct UnknownRoomType(String);

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownRoomType(s.to_string()))
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rentable unit. `number_of_reviews` and `review_scores_rating` are
/// derived from the listing's reviews and only written by the rating
/// recompute.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub host_name: String,
    pub host_id: String,
    pub neighborhood: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub room_type: RoomType,
    pub room_type_display: &'static str,
    pub accommodates: i64,
    pub bedrooms: i64,
    pub beds: i64,
    pub bathrooms: Decimal,
    pub price: Decimal,
    pub minimum_nights: i64,
    pub availability_365: i64,
    pub number_of_reviews: i64,
    pub review_scores_rating: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for Listing {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let room_type: RoomType = columns::get_parsed(row, "room_type")?;
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            host_name: row.try_get("host_name")?,
            host_id: row.try_get("host_id")?,
            neighborhood: row.try_get("neighborhood")?,
            latitude: COORDINATE.get_opt(row, "latitude")?,
            longitude: COORDINATE.get_opt(row, "longitude")?,
            room_type,
            room_type_display: room_type.label(),
            accommodates: row.try_get("accommodates")?,
            bedrooms: row.try_get("bedrooms")?,
            beds: row.try_get("beds")?,
            bathrooms: BATHROOMS.get(row, "bathrooms")?,
            price: MONEY.get(row, "price")?,
            minimum_nights: row.try_get("minimum_nights")?,
            availability_365: row.try_get("availability_365")?,
            number_of_reviews: row.try_get("number_of_reviews")?,
            review_scores_rating: SCORE.get_opt(row, "review_scores_rating")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn default_one() -> i64 {
    1
}

fn default_bathrooms() -> Decimal {
    Decimal::ONE
}

/// Client-writable listing fields, used for both create and full update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListingInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub host_name: String,
    #[validate(length(min = 1, max = 50))]
    pub host_id: String,
    #[validate(length(min = 1, max = 100))]
    pub neighborhood: String,
    #[serde(default)]
    pub latitude: Option<Decimal>,
    #[serde(default)]
    pub longitude: Option<Decimal>,
    pub room_type: RoomType,
    #[serde(default = "default_one")]
    #[validate(range(min = 1))]
    pub accommodates: i64,
    #[serde(default = "default_one")]
    #[validate(range(min = 1))]
    pub bedrooms: i64,
    #[serde(default = "default_one")]
    #[validate(range(min = 1))]
    pub beds: i64,
    #[serde(default = "default_bathrooms")]
    pub bathrooms: Decimal,
    pub price: Decimal,
    #[serde(default = "default_one")]
    #[validate(range(min = 1))]
    pub minimum_nights: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub availability_365: i64,
}

impl ListingInput {
    /// Field validation plus decimal precision checks.
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };

        if let Some(lat) = self.latitude {
            COORDINATE.check("latitude", lat, &mut errors);
        }
        if let Some(lng) = self.longitude {
            COORDINATE.check("longitude", lng, &mut errors);
        }
        if self.bathrooms.is_sign_negative() && !self.bathrooms.is_zero() {
            errors.push(
                "bathrooms",
                ValidationKind::RangeConstraint,
                "Ensure this value is greater than or equal to 0.",
            );
        } else {
            BATHROOMS.check("bathrooms", self.bathrooms, &mut errors);
        }
        MONEY.check("price", self.price, &mut errors);

        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingFilter {
    pub host_id: Option<String>,
    pub neighborhood: Option<String>,
    pub room_type: Option<RoomType>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
}
