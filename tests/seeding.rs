mod common;

use chrono::NaiveDate;
use common::pool;
use listings_api::models::ListingFilter;
use listings_api::seed::{SeedCounts, Seeder};
use listings_api::services::listings;

fn counts() -> SeedCounts {
    SeedCounts {
        listings: 3,
        bookings: 4,
        reviews: 5,
    }
}

#[actix_web::test]
async fn second_run_keeps_existing_rows() {
    let pool = pool().await;
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    Seeder::new(2024, today).run(&pool, counts()).await.unwrap();
    let report = Seeder::new(2024, today).run(&pool, counts()).await.unwrap();
    assert_eq!(report.listings, 3);

    let mut hosts: Vec<String> = listings::list_listings(&pool, &ListingFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.host_id)
        .collect();
    hosts.sort();
    assert_eq!(
        hosts,
        ["HOST1000", "HOST1001", "HOST1002", "HOST1003", "HOST1004", "HOST1005"]
    );
}
