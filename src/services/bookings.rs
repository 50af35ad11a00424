use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::listings::fetch_listing;
use crate::error::{AppError, FieldErrors, ValidationKind};
use crate::models::booking::nights_between;
use crate::models::columns::MONEY;
use crate::models::{Booking, BookingFilter, BookingUpdate, Listing, NewBooking};

const BOOKING_SELECT: &str = "SELECT b.*, l.title AS listing_title \
     FROM bookings b JOIN listings l ON l.id = b.listing_id";

/// The parts of a listing that constrain a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayTerms {
    pub minimum_nights: i64,
    pub price: Decimal,
}

impl StayTerms {
    pub fn of(listing: &Listing) -> Self {
        Self {
            minimum_nights: listing.minimum_nights,
            price: listing.price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuote {
    pub nights: i64,
    pub price_per_night: Decimal,
    pub total_price: Decimal,
}

pub fn check_date_order(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), FieldErrors> {
    if check_out <= check_in {
        return Err(FieldErrors::single(
            "check_out",
            ValidationKind::DateOrdering,
            "Check-out date must be after check-in date.",
        ));
    }
    Ok(())
}

pub fn check_minimum_stay(terms: StayTerms, nights: i64) -> Result<(), FieldErrors> {
    if nights < terms.minimum_nights {
        return Err(FieldErrors::single(
            "check_out",
            ValidationKind::MinimumStay,
            format!(
                "Minimum {} nights required for this listing.",
                terms.minimum_nights
            ),
        ));
    }
    Ok(())
}

/// Validates the stay and prices it. Without an explicit nightly price the
/// listing's current price applies.
pub fn quote_booking(
    terms: StayTerms,
    check_in: NaiveDate,
    check_out: NaiveDate,
    price_per_night: Option<Decimal>,
) -> Result<BookingQuote, FieldErrors> {
    check_date_order(check_in, check_out)?;
    let nights = nights_between(check_in, check_out);
    check_minimum_stay(terms, nights)?;

    let price_per_night = price_per_night.unwrap_or(terms.price);
    let total_price = price_per_night * Decimal::from(nights);
    check_total_price(total_price)?;

    Ok(BookingQuote {
        nights,
        price_per_night,
        total_price,
    })
}

/// The total has to fit its money column like any supplied amount.
pub fn check_total_price(total_price: Decimal) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    MONEY.check("total_price", total_price, &mut errors);
    errors.into_result()
}

pub async fn fetch_booking(conn: &mut SqliteConnection, id: i64) -> Result<Booking, AppError> {
    let sql = format!("{BOOKING_SELECT} WHERE b.id = ?");
    sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("booking", id))
}

pub async fn get_booking(pool: &SqlitePool, id: i64) -> Result<Booking, AppError> {
    let mut conn = pool.acquire().await?;
    fetch_booking(&mut conn, id).await
}

/// Creates a booking after date, minimum-stay and pricing rules pass.
///
/// No overlap check is made against other bookings of the listing, and the
/// listing's rating aggregates are not touched.
pub async fn create_booking(pool: &SqlitePool, new: &NewBooking) -> Result<Booking, AppError> {
    new.check()?;
    check_date_order(new.check_in, new.check_out)?;

    let mut tx = pool.begin().await?;
    let listing = fetch_listing(&mut tx, new.listing_id).await?;
    let quote = quote_booking(
        StayTerms::of(&listing),
        new.check_in,
        new.check_out,
        new.price_per_night,
    )?;
    let status = new.status.unwrap_or_default();
    let now = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO bookings (
            listing_id, guest_name, guest_email, guest_phone, check_in, check_out, guests,
            price_per_night, total_price, status, special_requests, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(listing.id)
    .bind(&new.guest_name)
    .bind(&new.guest_email)
    .bind(&new.guest_phone)
    .bind(new.check_in)
    .bind(new.check_out)
    .bind(new.guests)
    .bind(MONEY.to_scaled(quote.price_per_night))
    .bind(MONEY.to_scaled(quote.total_price))
    .bind(status.as_str())
    .bind(&new.special_requests)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let booking = fetch_booking(&mut tx, id).await?;
    tx.commit().await?;

    log::info!(
        "created booking {id} on listing {} for {} nights, total {}",
        listing.id,
        quote.nights,
        quote.total_price
    );
    Ok(booking)
}

/// Full update of a booking. Date ordering and the listing's current minimum
/// stay are checked on every save.
pub async fn update_booking(
    pool: &SqlitePool,
    id: i64,
    update: &BookingUpdate,
) -> Result<Booking, AppError> {
    update.check()?;
    check_date_order(update.check_in, update.check_out)?;

    let mut tx = pool.begin().await?;
    let current = fetch_booking(&mut tx, id).await?;
    let listing = fetch_listing(&mut tx, update.listing_id).await?;
    check_minimum_stay(
        StayTerms::of(&listing),
        nights_between(update.check_in, update.check_out),
    )?;

    let price_per_night = update.price_per_night.unwrap_or(current.price_per_night);
    let total_price = update.total_price.unwrap_or(current.total_price);
    check_total_price(total_price)?;
    let status = update.status.unwrap_or(current.status);

    sqlx::query(
        r#"
        UPDATE bookings SET
            listing_id = ?, guest_name = ?, guest_email = ?, guest_phone = ?,
            check_in = ?, check_out = ?, guests = ?, price_per_night = ?, total_price = ?,
            status = ?, special_requests = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.listing_id)
    .bind(&update.guest_name)
    .bind(&update.guest_email)
    .bind(&update.guest_phone)
    .bind(update.check_in)
    .bind(update.check_out)
    .bind(update.guests)
    .bind(MONEY.to_scaled(price_per_night))
    .bind(MONEY.to_scaled(total_price))
    .bind(status.as_str())
    .bind(&update.special_requests)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let booking = fetch_booking(&mut tx, id).await?;
    tx.commit().await?;
    Ok(booking)
}

pub async fn delete_booking(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("booking", id));
    }
    log::info!("deleted booking {id}");
    Ok(())
}

pub async fn list_bookings(
    pool: &SqlitePool,
    filter: &BookingFilter,
) -> Result<Vec<Booking>, AppError> {
    let mut query = QueryBuilder::<Sqlite>::new(BOOKING_SELECT);
    query.push(" WHERE 1=1");

    if let Some(listing_id) = filter.listing_id {
        query.push(" AND b.listing_id = ").push_bind(listing_id);
    }
    if let Some(from) = filter.check_in_from {
        query.push(" AND b.check_in >= ").push_bind(from);
    }
    if let Some(to) = filter.check_out_to {
        query.push(" AND b.check_out <= ").push_bind(to);
    }
    if let Some(status) = filter.status {
        query.push(" AND b.status = ").push_bind(status.as_str());
    }
    if let Some(email) = &filter.guest_email {
        query.push(" AND b.guest_email = ").push_bind(email.clone());
    }
    query.push(" ORDER BY b.created_at DESC, b.id DESC");

    let bookings = query.build_query_as::<Booking>().fetch_all(pool).await?;
    Ok(bookings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn terms() -> StayTerms {
        StayTerms {
            minimum_nights: 2,
            price: Decimal::new(10_000, 2),
        }
    }

    #[test]
    fn one_night_below_minimum_is_rejected() {
        let errors = quote_booking(terms(), date(10), date(11), None).unwrap_err();
        assert_eq!(errors.kind_of("check_out"), Some(ValidationKind::MinimumStay));
        assert_eq!(
            errors.message_of("check_out"),
            Some("Minimum 2 nights required for this listing.")
        );
    }

    #[test]
    fn same_day_checkout_is_a_date_ordering_error() {
        let errors = quote_booking(terms(), date(10), date(10), None).unwrap_err();
        assert_eq!(errors.kind_of("check_out"), Some(ValidationKind::DateOrdering));
    }

    #[test]
    fn reversed_dates_are_a_date_ordering_error() {
        let errors = quote_booking(terms(), date(13), date(10), None).unwrap_err();
        assert_eq!(errors.kind_of("check_out"), Some(ValidationKind::DateOrdering));
    }

    #[test]
    fn listing_price_is_used_when_none_given() {
        let quote = quote_booking(terms(), date(10), date(13), None).unwrap();
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.price_per_night, Decimal::new(10_000, 2));
        assert_eq!(quote.total_price.to_string(), "300.00");
    }

    #[test]
    fn explicit_price_is_multiplied_exactly() {
        let quote = quote_booking(terms(), date(1), date(8), Some(Decimal::new(3333, 2))).unwrap();
        assert_eq!(quote.total_price, Decimal::new(23331, 2));
    }

    #[test]
    fn total_beyond_money_precision_is_rejected() {
        // 99,999,999.99 a night for 30 nights needs ten whole digits
        let errors = quote_booking(
            terms(),
            date(1),
            date(31),
            Some(Decimal::new(9_999_999_999, 2)),
        )
        .unwrap_err();
        assert_eq!(errors.kind_of("total_price"), Some(ValidationKind::RangeConstraint));
    }
}
