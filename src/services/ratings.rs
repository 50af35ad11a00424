//! Derived rating aggregates on listings.
//!
//! Every review create, update and delete calls [`recompute_listing_rating`]
//! inside the same transaction as the review write. The recompute is a full
//! re-scan of the listing's reviews rather than an incremental counter: it is
//! O(reviews per listing) per write, and the result depends only on the rows
//! present, so edits and deletes need no special handling. Keep it that way
//! unless per-listing review volume grows large.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::columns::SCORE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingAggregate {
    pub number_of_reviews: i64,
    pub review_scores_rating: Option<Decimal>,
}

impl RatingAggregate {
    /// Aggregate for `count` reviews whose ratings add up to `sum`, or no
    /// rating at all for zero reviews.
    ///
    /// The mean is taken as an `f64` and rounded on its exact binary value,
    /// so 43 / 40 (stored as 1.07499...) becomes 1.07 and 25 / 8 becomes
    /// 3.12 (ties to even).
    pub fn from_totals(count: i64, sum: i64) -> Self {
        let review_scores_rating = if count > 0 {
            let mean = sum as f64 / count as f64;
            format!("{mean:.2}").parse::<Decimal>().ok()
        } else {
            None
        };

        Self {
            number_of_reviews: count,
            review_scores_rating,
        }
    }
}

/// Re-aggregates all reviews of `listing_id` and writes back only
/// `number_of_reviews` and `review_scores_rating`.
pub async fn recompute_listing_rating(
    conn: &mut SqliteConnection,
    listing_id: i64,
) -> Result<RatingAggregate, AppError> {
    let (count, sum): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(rating), 0) FROM reviews WHERE listing_id = ?",
    )
    .bind(listing_id)
    .fetch_one(&mut *conn)
    .await?;

    let aggregate = RatingAggregate::from_totals(count, sum);

    sqlx::query("UPDATE listings SET number_of_reviews = ?, review_scores_rating = ? WHERE id = ?")
        .bind(aggregate.number_of_reviews)
        .bind(aggregate.review_scores_rating.map(|r| SCORE.to_scaled(r)))
        .bind(listing_id)
        .execute(&mut *conn)
        .await?;

    log::debug!(
        "listing {listing_id} rating recomputed: {} reviews, rating {:?}",
        aggregate.number_of_reviews,
        aggregate.review_scores_rating
    );

    Ok(aggregate)
}
