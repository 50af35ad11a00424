pub mod booking;
pub mod columns;
pub mod listing;
pub mod review;

pub use booking::{Booking, BookingFilter, BookingStatus, BookingUpdate, NewBooking};
pub use listing::{Listing, ListingFilter, ListingInput, RoomType};
pub use review::{Review, ReviewFilter, ReviewInput};
