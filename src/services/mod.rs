//! Application services. Each write runs in a single transaction; review
//! writes call the rating recompute explicitly before committing.

pub mod bookings;
pub mod listings;
pub mod ratings;
pub mod reviews;
