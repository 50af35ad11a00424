#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use listings_api::db;
use listings_api::models::{Listing, ListingInput, NewBooking, ReviewInput, RoomType};
use listings_api::services::listings;

pub async fn pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn listing_input(host_id: &str) -> ListingInput {
    ListingInput {
        title: "Modern Loft in Trendy Neighborhood".into(),
        description: "Bright and quiet.".into(),
        host_name: "Robin Hale".into(),
        host_id: host_id.into(),
        neighborhood: "SoHo".into(),
        latitude: Some(Decimal::new(40_723_301, 6)),
        longitude: Some(Decimal::new(-74_002_988, 6)),
        room_type: RoomType::EntireHome,
        accommodates: 4,
        bedrooms: 2,
        beds: 2,
        bathrooms: Decimal::new(15, 1),
        price: money(10_000),
        minimum_nights: 2,
        availability_365: 200,
    }
}

pub async fn listing(pool: &SqlitePool, host_id: &str) -> Listing {
    listings::create_listing(pool, &listing_input(host_id)).await.unwrap()
}

pub fn booking(listing_id: i64, check_in: NaiveDate, check_out: NaiveDate) -> NewBooking {
    NewBooking {
        listing_id,
        guest_name: "Sam Carter".into(),
        guest_email: "sam@example.com".into(),
        guest_phone: String::new(),
        check_in,
        check_out,
        guests: 2,
        price_per_night: None,
        status: None,
        special_requests: String::new(),
    }
}

pub fn review(listing_id: i64, rating: i64) -> ReviewInput {
    ReviewInput {
        listing_id,
        reviewer_name: "Kai Dalton".into(),
        reviewer_id: String::new(),
        comments: "Lovely stay.".into(),
        rating,
        accuracy_rating: None,
        cleanliness_rating: None,
        checkin_rating: None,
        communication_rating: None,
        location_rating: None,
        value_rating: None,
    }
}
