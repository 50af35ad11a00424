mod common;

use common::{booking, date, listing, listing_input, money, pool, review};
use listings_api::error::{AppError, ValidationKind};
use listings_api::models::{BookingFilter, BookingStatus, ListingFilter, ReviewFilter, RoomType};
use listings_api::services::{bookings, listings, reviews};
use rust_decimal::Decimal;

#[actix_web::test]
async fn duplicate_host_id_conflicts() {
    let pool = pool().await;
    listing(&pool, "HOST1000").await;

    let err = listings::create_listing(&pool, &listing_input("HOST1000"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::HostConflict { ref host_id } if host_id == "HOST1000"));
}

#[actix_web::test]
async fn update_to_taken_host_id_conflicts() {
    let pool = pool().await;
    listing(&pool, "HOST1000").await;
    let other = listing(&pool, "HOST1001").await;

    let err = listings::update_listing(&pool, other.id, &listing_input("HOST1000"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::HostConflict { .. }));
}

#[actix_web::test]
async fn decimals_round_trip_exactly() {
    let pool = pool().await;
    let l = listing(&pool, "HOST1000").await;

    assert_eq!(l.price.to_string(), "100.00");
    assert_eq!(l.bathrooms.to_string(), "1.5");
    assert_eq!(l.latitude, Some(Decimal::new(40_723_301, 6)));
    assert_eq!(l.longitude, Some(Decimal::new(-74_002_988, 6)));
    assert_eq!(l.room_type_display, "Entire Home/Apt");
    assert_eq!(l.number_of_reviews, 0);
    assert_eq!(l.review_scores_rating, None);
}

#[actix_web::test]
async fn over_precise_price_is_rejected() {
    let pool = pool().await;
    let mut input = listing_input("HOST1000");
    input.price = Decimal::new(100_001, 3);

    let err = listings::create_listing(&pool, &input).await.unwrap_err();
    assert_eq!(
        err.field_errors().and_then(|f| f.kind_of("price")),
        Some(ValidationKind::RangeConstraint)
    );
}

#[actix_web::test]
async fn update_keeps_derived_rating_fields() {
    let pool = pool().await;
    let l = listing(&pool, "HOST1000").await;
    reviews::create_review(&pool, &review(l.id, 4)).await.unwrap();

    let mut input = listing_input("HOST1000");
    input.price = money(12_500);
    let updated = listings::update_listing(&pool, l.id, &input).await.unwrap();

    assert_eq!(updated.price, money(12_500));
    assert_eq!(updated.number_of_reviews, 1);
    assert_eq!(updated.review_scores_rating, Some(Decimal::new(400, 2)));
}

#[actix_web::test]
async fn deleting_listing_cascades() {
    let pool = pool().await;
    let l = listing(&pool, "HOST1000").await;
    let b = bookings::create_booking(&pool, &booking(l.id, date(2024, 2, 1), date(2024, 2, 4)))
        .await
        .unwrap();
    let r = reviews::create_review(&pool, &review(l.id, 5)).await.unwrap();

    listings::delete_listing(&pool, l.id).await.unwrap();

    assert!(matches!(
        bookings::get_booking(&pool, b.id).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        reviews::get_review(&pool, r.id).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        listings::delete_listing(&pool, l.id).await,
        Err(AppError::NotFound { .. })
    ));
}

#[actix_web::test]
async fn listing_filters() {
    let pool = pool().await;
    let cheap = listing(&pool, "HOST1000").await;

    let mut input = listing_input("HOST1001");
    input.neighborhood = "Queens".into();
    input.room_type = RoomType::PrivateRoom;
    input.price = money(25_000);
    input.title = "Quiet Room in Friendly Neighborhood".into();
    let pricey = listings::create_listing(&pool, &input).await.unwrap();

    let by_host = listings::list_listings(
        &pool,
        &ListingFilter {
            host_id: Some("HOST1001".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_host.len(), 1);
    assert_eq!(by_host[0].id, pricey.id);

    let by_price = listings::list_listings(
        &pool,
        &ListingFilter {
            min_price: Some(money(10_000)),
            max_price: Some(money(20_000)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_price.iter().map(|l| l.id).collect::<Vec<_>>(), vec![cheap.id]);

    let by_type = listings::list_listings(
        &pool,
        &ListingFilter {
            room_type: Some(RoomType::PrivateRoom),
            neighborhood: Some("Queens".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_type.len(), 1);

    let searched = listings::list_listings(
        &pool,
        &ListingFilter {
            search: Some("quiet room".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, pricey.id);

    let all = listings::list_listings(&pool, &ListingFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[actix_web::test]
async fn booking_filters() {
    let pool = pool().await;
    let a = listing(&pool, "HOST1000").await;
    let b = listing(&pool, "HOST1001").await;

    bookings::create_booking(&pool, &booking(a.id, date(2024, 1, 1), date(2024, 1, 4)))
        .await
        .unwrap();
    let mut later = booking(a.id, date(2024, 3, 1), date(2024, 3, 4));
    later.guest_email = "pat@example.com".into();
    later.status = Some(BookingStatus::Confirmed);
    let later = bookings::create_booking(&pool, &later).await.unwrap();
    bookings::create_booking(&pool, &booking(b.id, date(2024, 3, 1), date(2024, 3, 4)))
        .await
        .unwrap();

    let in_march = bookings::list_bookings(
        &pool,
        &BookingFilter {
            listing_id: Some(a.id),
            check_in_from: Some(date(2024, 2, 1)),
            check_out_to: Some(date(2024, 3, 31)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(in_march.len(), 1);
    assert_eq!(in_march[0].id, later.id);

    let confirmed = bookings::list_bookings(
        &pool,
        &BookingFilter {
            status: Some(BookingStatus::Confirmed),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(confirmed.len(), 1);

    let by_email = bookings::list_bookings(
        &pool,
        &BookingFilter {
            guest_email: Some("sam@example.com".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_email.len(), 2);
}

#[actix_web::test]
async fn review_filters() {
    let pool = pool().await;
    let l = listing(&pool, "HOST1000").await;
    for rating in [2, 4, 5, 5] {
        reviews::create_review(&pool, &review(l.id, rating)).await.unwrap();
    }

    let fives = reviews::list_reviews(
        &pool,
        &ReviewFilter {
            listing_id: Some(l.id),
            rating: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(fives.len(), 2);

    let good = reviews::list_reviews(
        &pool,
        &ReviewFilter {
            min_rating: Some(4),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(good.len(), 3);

    let an_hour_ago = chrono::Utc::now() - chrono::Duration::hours(1);
    let recent = reviews::list_reviews(
        &pool,
        &ReviewFilter {
            created_after: Some(an_hour_ago),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(recent.len(), 4);

    let older = reviews::list_reviews(
        &pool,
        &ReviewFilter {
            created_before: Some(an_hour_ago),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(older.is_empty());
}
