//! Listings, bookings and reviews for a travel accommodation platform.
//!
//! The HTTP layer in [`handlers`] is thin; the rules live in [`services`]:
//! booking validation and pricing, and the review-driven rating aggregates
//! kept on each listing.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod services;
