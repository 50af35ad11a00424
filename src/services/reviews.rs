use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::listings::fetch_listing;
use super::ratings::recompute_listing_rating;
use crate::error::AppError;
use crate::models::{Review, ReviewFilter, ReviewInput};

pub async fn fetch_review(conn: &mut SqliteConnection, id: i64) -> Result<Review, AppError> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("review", id))
}

pub async fn get_review(pool: &SqlitePool, id: i64) -> Result<Review, AppError> {
    let mut conn = pool.acquire().await?;
    fetch_review(&mut conn, id).await
}

pub async fn create_review(pool: &SqlitePool, input: &ReviewInput) -> Result<Review, AppError> {
    input.check()?;

    let mut tx = pool.begin().await?;
    fetch_listing(&mut tx, input.listing_id).await?;
    let now = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO reviews (
            listing_id, reviewer_name, reviewer_id, comments, rating,
            accuracy_rating, cleanliness_rating, checkin_rating, communication_rating,
            location_rating, value_rating, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(input.listing_id)
    .bind(&input.reviewer_name)
    .bind(&input.reviewer_id)
    .bind(&input.comments)
    .bind(input.rating)
    .bind(input.accuracy_rating)
    .bind(input.cleanliness_rating)
    .bind(input.checkin_rating)
    .bind(input.communication_rating)
    .bind(input.location_rating)
    .bind(input.value_rating)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    recompute_listing_rating(&mut tx, input.listing_id).await?;
    let review = fetch_review(&mut tx, id).await?;
    tx.commit().await?;

    log::info!("created review {id} on listing {}", input.listing_id);
    Ok(review)
}

/// Full update of a review. A review moved to another listing refreshes the
/// aggregates of both listings.
pub async fn update_review(
    pool: &SqlitePool,
    id: i64,
    input: &ReviewInput,
) -> Result<Review, AppError> {
    input.check()?;

    let mut tx = pool.begin().await?;
    let previous = fetch_review(&mut tx, id).await?;
    if previous.listing_id != input.listing_id {
        fetch_listing(&mut tx, input.listing_id).await?;
    }

    sqlx::query(
        r#"
        UPDATE reviews SET
            listing_id = ?, reviewer_name = ?, reviewer_id = ?, comments = ?, rating = ?,
            accuracy_rating = ?, cleanliness_rating = ?, checkin_rating = ?,
            communication_rating = ?, location_rating = ?, value_rating = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(input.listing_id)
    .bind(&input.reviewer_name)
    .bind(&input.reviewer_id)
    .bind(&input.comments)
    .bind(input.rating)
    .bind(input.accuracy_rating)
    .bind(input.cleanliness_rating)
    .bind(input.checkin_rating)
    .bind(input.communication_rating)
    .bind(input.location_rating)
    .bind(input.value_rating)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    recompute_listing_rating(&mut tx, input.listing_id).await?;
    if previous.listing_id != input.listing_id {
        recompute_listing_rating(&mut tx, previous.listing_id).await?;
    }

    let review = fetch_review(&mut tx, id).await?;
    tx.commit().await?;
    Ok(review)
}

/// Deletes a review and refreshes its listing's aggregates. The listing id
/// is read before the row goes away.
pub async fn delete_review(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let listing_id = fetch_review(&mut tx, id).await?.listing_id;

    sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    recompute_listing_rating(&mut tx, listing_id).await?;
    tx.commit().await?;

    log::info!("deleted review {id} from listing {listing_id}");
    Ok(())
}

pub async fn list_reviews(pool: &SqlitePool, filter: &ReviewFilter) -> Result<Vec<Review>, AppError> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM reviews WHERE 1=1");

    if let Some(listing_id) = filter.listing_id {
        query.push(" AND listing_id = ").push_bind(listing_id);
    }
    if let Some(rating) = filter.rating {
        query.push(" AND rating = ").push_bind(rating);
    }
    if let Some(min) = filter.min_rating {
        query.push(" AND rating >= ").push_bind(min);
    }
    if let Some(after) = filter.created_after {
        query.push(" AND created_at >= ").push_bind(after);
    }
    if let Some(before) = filter.created_before {
        query.push(" AND created_at < ").push_bind(before);
    }
    query.push(" ORDER BY created_at DESC, id DESC");

    let reviews = query.build_query_as::<Review>().fetch_all(pool).await?;
    Ok(reviews)
}
