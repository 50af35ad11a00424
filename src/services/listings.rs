use chrono::Utc;
use rust_decimal::RoundingStrategy;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::columns::{BATHROOMS, COORDINATE, MONEY};
use crate::models::{Listing, ListingFilter, ListingInput};

pub async fn fetch_listing(conn: &mut SqliteConnection, id: i64) -> Result<Listing, AppError> {
    sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("listing", id))
}

pub async fn get_listing(pool: &SqlitePool, id: i64) -> Result<Listing, AppError> {
    let mut conn = pool.acquire().await?;
    fetch_listing(&mut conn, id).await
}

fn host_conflict(err: sqlx::Error, host_id: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::HostConflict {
            host_id: host_id.to_string(),
        },
        _ => AppError::Database(err),
    }
}

pub async fn create_listing(pool: &SqlitePool, input: &ListingInput) -> Result<Listing, AppError> {
    input.check()?;
    let now = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO listings (
            title, description, host_name, host_id, neighborhood, latitude, longitude,
            room_type, accommodates, bedrooms, beds, bathrooms, price, minimum_nights,
            availability_365, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.host_name)
    .bind(&input.host_id)
    .bind(&input.neighborhood)
    .bind(input.latitude.map(|v| COORDINATE.to_scaled(v)))
    .bind(input.longitude.map(|v| COORDINATE.to_scaled(v)))
    .bind(input.room_type.as_str())
    .bind(input.accommodates)
    .bind(input.bedrooms)
    .bind(input.beds)
    .bind(BATHROOMS.to_scaled(input.bathrooms))
    .bind(MONEY.to_scaled(input.price))
    .bind(input.minimum_nights)
    .bind(input.availability_365)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| host_conflict(e, &input.host_id))?;

    log::info!("created listing {id} for host {}", input.host_id);
    get_listing(pool, id).await
}

/// Replaces the client-writable fields. The derived rating fields are left
/// untouched.
pub async fn update_listing(
    pool: &SqlitePool,
    id: i64,
    input: &ListingInput,
) -> Result<Listing, AppError> {
    input.check()?;

    let result = sqlx::query(
        r#"
        UPDATE listings SET
            title = ?, description = ?, host_name = ?, host_id = ?, neighborhood = ?,
            latitude = ?, longitude = ?, room_type = ?, accommodates = ?, bedrooms = ?,
            beds = ?, bathrooms = ?, price = ?, minimum_nights = ?, availability_365 = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.host_name)
    .bind(&input.host_id)
    .bind(&input.neighborhood)
    .bind(input.latitude.map(|v| COORDINATE.to_scaled(v)))
    .bind(input.longitude.map(|v| COORDINATE.to_scaled(v)))
    .bind(input.room_type.as_str())
    .bind(input.accommodates)
    .bind(input.bedrooms)
    .bind(input.beds)
    .bind(BATHROOMS.to_scaled(input.bathrooms))
    .bind(MONEY.to_scaled(input.price))
    .bind(input.minimum_nights)
    .bind(input.availability_365)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| host_conflict(e, &input.host_id))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("listing", id));
    }
    get_listing(pool, id).await
}

/// Deletes a listing together with its bookings and reviews.
pub async fn delete_listing(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM listings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("listing", id));
    }
    log::info!("deleted listing {id}");
    Ok(())
}

pub async fn list_listings(
    pool: &SqlitePool,
    filter: &ListingFilter,
) -> Result<Vec<Listing>, AppError> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM listings WHERE 1=1");

    if let Some(host_id) = &filter.host_id {
        query.push(" AND host_id = ").push_bind(host_id.clone());
    }
    if let Some(neighborhood) = &filter.neighborhood {
        query.push(" AND neighborhood = ").push_bind(neighborhood.clone());
    }
    if let Some(room_type) = filter.room_type {
        query.push(" AND room_type = ").push_bind(room_type.as_str());
    }
    if let Some(min) = filter.min_price {
        let min = min.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
        query.push(" AND price >= ").push_bind(MONEY.to_scaled(min));
    }
    if let Some(max) = filter.max_price {
        let max = max.round_dp_with_strategy(2, RoundingStrategy::ToNegativeInfinity);
        query.push(" AND price <= ").push_bind(MONEY.to_scaled(max));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{term}%");
        query
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR host_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR neighborhood LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    query.push(" ORDER BY created_at DESC, id DESC");

    let listings = query.build_query_as::<Listing>().fetch_all(pool).await?;
    Ok(listings)
}
