//! Sample data for development databases.
//!
//! Everything goes through the regular services, so bookings are priced by
//! the creation path and review aggregates stay consistent. The generator
//! owns its RNG; the same seed always produces the same data.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{BookingStatus, Listing, ListingInput, NewBooking, ReviewInput, RoomType};
use crate::services::{bookings, listings, reviews};

const NEIGHBORHOODS: &[&str] = &[
    "Manhattan",
    "Brooklyn",
    "Queens",
    "Bronx",
    "Staten Island",
    "Downtown",
    "Midtown",
    "Uptown",
    "East Side",
    "West Side",
    "Greenwich Village",
    "SoHo",
    "Chelsea",
    "Upper East Side",
    "Upper West Side",
];

const HOST_NAMES: &[&str] = &[
    "Avery Quinn",
    "Jordan Blake",
    "Riley Morgan",
    "Casey Lin",
    "Taylor Reed",
    "Morgan Ellis",
    "Jamie Ortiz",
    "Drew Patel",
    "Skyler Hayes",
    "Parker Nguyen",
];

const TITLES: &[&str] = &[
    "Cozy Apartment in the Heart of the City",
    "Beautiful Studio with Amazing Views",
    "Spacious 2BR Apartment Near Subway",
    "Modern Loft in Trendy Neighborhood",
    "Charming House with Garden",
    "Luxury Penthouse with Rooftop Access",
    "Quiet Room in Friendly Neighborhood",
    "Historic Brownstone Apartment",
    "Family-Friendly 3BR House",
    "Boutique Apartment in Prime Location",
];

const DESCRIPTIONS: &[&str] = &[
    "A comfortable space close to public transportation and local attractions.",
    "Modern amenities in a convenient location for business and leisure trips.",
    "Well-appointed rooms near restaurants, shops and entertainment.",
    "A peaceful retreat that still keeps the city within easy reach.",
];

const GUEST_NAMES: &[&str] = &[
    "Alex Rivera",
    "Sam Carter",
    "Charlie Kim",
    "Dana Brooks",
    "Emerson Cole",
    "Finley Shaw",
    "Harper Wade",
    "Jesse Lowe",
];

const SPECIAL_REQUESTS: &[&str] = &[
    "Late check-in requested",
    "Need extra towels",
    "Quiet room preferred",
    "Early check-in if possible",
];

const REVIEWER_NAMES: &[&str] = &[
    "Robin Hale",
    "Logan Price",
    "Rowan Fisher",
    "Sage Bennett",
    "Quinn Foster",
    "Kai Dalton",
];

const COMMENTS: &[&str] = &[
    "Great place to stay! Very clean and comfortable.",
    "Amazing location and wonderful host.",
    "Perfect for our needs. Would stay again.",
    "Lovely space, exactly as described.",
    "Convenient location with easy access to public transport.",
    "Clean, modern, and in a great neighborhood.",
];

// Weights for ratings 1..=5.
const RATING_WEIGHTS: [u32; 5] = [5, 10, 15, 30, 40];

#[derive(Debug, Clone, Copy)]
pub struct SeedCounts {
    pub listings: usize,
    pub bookings: usize,
    pub reviews: usize,
}

impl Default for SeedCounts {
    fn default() -> Self {
        Self {
            listings: 20,
            bookings: 50,
            reviews: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub listings: usize,
    pub bookings: usize,
    pub reviews: usize,
}

pub struct Seeder {
    rng: StdRng,
    today: NaiveDate,
}

impl Seeder {
    pub fn new(seed: u64, today: NaiveDate) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            today,
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items.choose(&mut self.rng).copied().unwrap_or_default()
    }

    /// Random decimal in `[low, high]` with `places` decimal places.
    fn decimal_between(&mut self, low: i64, high: i64, places: u32) -> Decimal {
        let scale = 10_i64.pow(places);
        Decimal::new(self.rng.gen_range(low * scale..=high * scale), places)
    }

    pub fn listing_input(&mut self, index: usize) -> ListingInput {
        let room_type = *RoomType::ALL.choose(&mut self.rng).unwrap_or(&RoomType::EntireHome);
        let bedrooms = if room_type == RoomType::EntireHome {
            self.rng.gen_range(1..=4)
        } else {
            self.rng.gen_range(1..=2)
        };
        // 40.5..40.9 N, 74.0..73.7 W
        let latitude = Decimal::new(self.rng.gen_range(40_500_000..=40_900_000), 6);
        let longitude = Decimal::new(self.rng.gen_range(-74_000_000..=-73_700_000), 6);

        ListingInput {
            title: self.pick(TITLES).to_string(),
            description: self.pick(DESCRIPTIONS).to_string(),
            host_name: self.pick(HOST_NAMES).to_string(),
            host_id: format!("HOST{}", 1000 + index),
            neighborhood: self.pick(NEIGHBORHOODS).to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            room_type,
            accommodates: self.rng.gen_range(1..=6),
            bedrooms,
            beds: self.rng.gen_range(1..=4),
            bathrooms: self.decimal_between(1, 3, 1),
            price: self.decimal_between(50, 500, 2),
            minimum_nights: self.rng.gen_range(1..=7),
            availability_365: self.rng.gen_range(0..=365),
        }
    }

    fn status_for(&mut self, check_in: NaiveDate, check_out: NaiveDate) -> BookingStatus {
        if check_out < self.today {
            BookingStatus::Completed
        } else if check_in > self.today {
            let weighted = [
                (BookingStatus::Pending, 1),
                (BookingStatus::Confirmed, 3),
                (BookingStatus::Completed, 5),
                (BookingStatus::Cancelled, 1),
            ];
            weighted
                .choose_weighted(&mut self.rng, |(_, w)| *w)
                .map(|(status, _)| *status)
                .unwrap_or_default()
        } else if self.rng.gen_bool(0.5) {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Completed
        }
    }

    pub fn booking_for(&mut self, listing: &Listing, index: usize) -> NewBooking {
        let check_in = self.today + Duration::days(self.rng.gen_range(-180..=180));
        let nights = self.rng.gen_range(1..=14).max(listing.minimum_nights);
        let check_out = check_in + Duration::days(nights);
        let status = self.status_for(check_in, check_out);
        let special_requests = if self.rng.gen_bool(0.3) {
            self.pick(SPECIAL_REQUESTS).to_string()
        } else {
            String::new()
        };

        NewBooking {
            listing_id: listing.id,
            guest_name: self.pick(GUEST_NAMES).to_string(),
            guest_email: format!("guest{index}@example.com"),
            guest_phone: format!("+1-555-{}", self.rng.gen_range(1000..=9999)),
            check_in,
            check_out,
            guests: self.rng.gen_range(1..=listing.accommodates.max(1)),
            price_per_night: Some(listing.price),
            status: Some(status),
            special_requests,
        }
    }

    fn maybe_sub_rating(&mut self) -> Option<i64> {
        if self.rng.gen_bool(0.7) {
            Some(self.rng.gen_range(1..=5))
        } else {
            None
        }
    }

    pub fn review_for(&mut self, listing: &Listing) -> ReviewInput {
        let rating = RATING_WEIGHTS
            .iter()
            .enumerate()
            .collect::<Vec<_>>()
            .choose_weighted(&mut self.rng, |(_, w)| **w)
            .map(|(i, _)| *i as i64 + 1)
            .unwrap_or(5);

        ReviewInput {
            listing_id: listing.id,
            reviewer_name: self.pick(REVIEWER_NAMES).to_string(),
            reviewer_id: format!("REV{}", self.rng.gen_range(10_000..=99_999)),
            comments: self.pick(COMMENTS).to_string(),
            rating,
            accuracy_rating: self.maybe_sub_rating(),
            cleanliness_rating: self.maybe_sub_rating(),
            checkin_rating: self.maybe_sub_rating(),
            communication_rating: self.maybe_sub_rating(),
            location_rating: self.maybe_sub_rating(),
            value_rating: self.maybe_sub_rating(),
        }
    }

    /// Creates the requested rows. Host ids continue after the highest
    /// `HOST` number already stored, so runs can be stacked on one database.
    pub async fn run(&mut self, pool: &SqlitePool, counts: SeedCounts) -> Result<SeedReport, AppError> {
        let offset = next_host_offset(pool).await?;
        log::info!("creating {} listings", counts.listings);
        let mut created = Vec::with_capacity(counts.listings);
        for i in 0..counts.listings {
            let input = self.listing_input(offset + i);
            created.push(listings::create_listing(pool, &input).await?);
            if (i + 1) % 5 == 0 {
                log::info!("  created {}/{} listings", i + 1, counts.listings);
            }
        }

        if created.is_empty() {
            return Ok(SeedReport {
                listings: 0,
                bookings: 0,
                reviews: 0,
            });
        }

        log::info!("creating {} bookings", counts.bookings);
        for i in 0..counts.bookings {
            let listing = &created[self.rng.gen_range(0..created.len())];
            let booking = self.booking_for(listing, i);
            bookings::create_booking(pool, &booking).await?;
            if (i + 1) % 10 == 0 {
                log::info!("  created {}/{} bookings", i + 1, counts.bookings);
            }
        }

        log::info!("creating {} reviews", counts.reviews);
        for i in 0..counts.reviews {
            let listing = &created[self.rng.gen_range(0..created.len())];
            let review = self.review_for(listing);
            reviews::create_review(pool, &review).await?;
            if (i + 1) % 20 == 0 {
                log::info!("  created {}/{} reviews", i + 1, counts.reviews);
            }
        }

        Ok(SeedReport {
            listings: created.len(),
            bookings: counts.bookings,
            reviews: counts.reviews,
        })
    }
}

/// Index of the first unused `HOST{1000 + index}` id.
async fn next_host_offset(pool: &SqlitePool) -> Result<usize, AppError> {
    let highest: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(CAST(SUBSTR(host_id, 5) AS INTEGER)) FROM listings \
         WHERE host_id GLOB 'HOST[0-9]*'",
    )
    .fetch_one(pool)
    .await?;

    Ok(highest
        .map(|n| usize::try_from(n - 999).unwrap_or(0))
        .unwrap_or(0))
}

/// Removes all reviews, bookings and listings.
pub async fn clear(pool: &SqlitePool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM reviews").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM bookings").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM listings").execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn same_seed_same_listings() {
        let a = Seeder::new(7, today()).listing_input(0);
        let b = Seeder::new(7, today()).listing_input(0);
        assert_eq!(a.title, b.title);
        assert_eq!(a.price, b.price);
        assert_eq!(a.latitude, b.latitude);
    }

    #[test]
    fn generated_listings_pass_validation() {
        let mut seeder = Seeder::new(42, today());
        for i in 0..50 {
            let input = seeder.listing_input(i);
            assert!(input.check().is_ok(), "listing {i} invalid: {input:?}");
            assert_eq!(input.host_id, format!("HOST{}", 1000 + i));
        }
    }

    #[test]
    fn generated_reviews_pass_validation() {
        let mut seeder = Seeder::new(3, today());
        let listing_input = seeder.listing_input(0);
        let listing = Listing {
            id: 1,
            title: listing_input.title,
            description: listing_input.description,
            host_name: listing_input.host_name,
            host_id: listing_input.host_id,
            neighborhood: listing_input.neighborhood,
            latitude: listing_input.latitude,
            longitude: listing_input.longitude,
            room_type: listing_input.room_type,
            room_type_display: listing_input.room_type.label(),
            accommodates: listing_input.accommodates,
            bedrooms: listing_input.bedrooms,
            beds: listing_input.beds,
            bathrooms: listing_input.bathrooms,
            price: listing_input.price,
            minimum_nights: listing_input.minimum_nights,
            availability_365: listing_input.availability_365,
            number_of_reviews: 0,
            review_scores_rating: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        for _ in 0..100 {
            assert!(seeder.review_for(&listing).check().is_ok());
        }
        for i in 0..100 {
            let booking = seeder.booking_for(&listing, i);
            assert!(booking.check_out - booking.check_in >= Duration::days(listing.minimum_nights));
            assert!(booking.check().is_ok());
        }
    }
}
