use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::FieldErrors;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub listing_id: i64,
    pub reviewer_name: String,
    pub reviewer_id: String,
    pub comments: String,
    pub rating: i64,
    pub accuracy_rating: Option<i64>,
    pub cleanliness_rating: Option<i64>,
    pub checkin_rating: Option<i64>,
    pub communication_rating: Option<i64>,
    pub location_rating: Option<i64>,
    pub value_rating: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable review fields for create and full update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewInput {
    pub listing_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub reviewer_name: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub reviewer_id: String,
    pub comments: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    pub rating: i64,
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub accuracy_rating: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub cleanliness_rating: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub checkin_rating: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub communication_rating: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub location_rating: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub value_rating: Option<i64>,
}

impl ReviewInput {
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewFilter {
    pub listing_id: Option<i64>,
    pub rating: Option<i64>,
    pub min_rating: Option<i64>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}
