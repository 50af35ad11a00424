use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use validator::Validate;

use super::columns::{self, MONEY};
use crate::error::FieldErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown booking status {0:?}")]
pub struct UnknownStatus(String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole nights between two dates; negative when the dates are reversed.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// A reservation against one listing, as read back with the listing title
/// joined in.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: i64,
    pub listing: i64,
    pub listing_title: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i64,
    pub nights: i64,
    pub price_per_night: Decimal,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub status_display: &'static str,
    pub special_requests: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for Booking {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let check_in: NaiveDate = row.try_get("check_in")?;
        let check_out: NaiveDate = row.try_get("check_out")?;
        let status: BookingStatus = columns::get_parsed(row, "status")?;
        Ok(Self {
            id: row.try_get("id")?,
            listing: row.try_get("listing_id")?,
            listing_title: row.try_get("listing_title")?,
            guest_name: row.try_get("guest_name")?,
            guest_email: row.try_get("guest_email")?,
            guest_phone: row.try_get("guest_phone")?,
            check_in,
            check_out,
            guests: row.try_get("guests")?,
            nights: nights_between(check_in, check_out),
            price_per_night: MONEY.get(row, "price_per_night")?,
            total_price: MONEY.get(row, "total_price")?,
            status,
            status_display: status.label(),
            special_requests: row.try_get("special_requests")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn default_guests() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBooking {
    pub listing_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub guest_name: String,
    #[validate(email)]
    pub guest_email: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub guest_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    #[validate(range(min = 1))]
    pub guests: i64,
    #[serde(default)]
    pub price_per_night: Option<Decimal>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub special_requests: String,
}

impl NewBooking {
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if let Some(price) = self.price_per_night {
            MONEY.check("price_per_night", price, &mut errors);
        }
        errors.into_result()
    }
}

/// Full replacement of a booking. Price fields left out keep their stored
/// values; `total_price` is never re-derived here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingUpdate {
    pub listing_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub guest_name: String,
    #[validate(email)]
    pub guest_email: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub guest_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    #[validate(range(min = 1))]
    pub guests: i64,
    #[serde(default)]
    pub price_per_night: Option<Decimal>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub special_requests: String,
}

impl BookingUpdate {
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if let Some(price) = self.price_per_night {
            MONEY.check("price_per_night", price, &mut errors);
        }
        if let Some(total) = self.total_price {
            MONEY.check("total_price", total, &mut errors);
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingFilter {
    pub listing_id: Option<i64>,
    pub check_in_from: Option<NaiveDate>,
    pub check_out_to: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub guest_email: Option<String>,
}
