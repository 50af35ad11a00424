use clap::Parser;
use env_logger::Env;

use listings_api::config::Config;
use listings_api::db;
use listings_api::seed::{self, SeedCounts, Seeder};

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Seed the database with sample listings, bookings and reviews")]
struct Cli {
    /// Number of listings to create
    #[arg(long, default_value_t = 20)]
    listings: usize,
    /// Number of bookings to create
    #[arg(long, default_value_t = 50)]
    bookings: usize,
    /// Number of reviews to create
    #[arg(long, default_value_t = 100)]
    reviews: usize,
    /// RNG seed; the same seed yields the same data
    #[arg(long, default_value_t = 2024)]
    seed: u64,
    /// Keep existing rows instead of clearing the tables first
    #[arg(long, default_value_t = false)]
    keep_existing: bool,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = db::get_db_pool(&config).await?;
    db::run_migrations(&pool).await?;

    if !cli.keep_existing {
        log::warn!("Clearing existing data...");
        seed::clear(&pool).await?;
    }

    let today = chrono::Utc::now().date_naive();
    let counts = SeedCounts {
        listings: cli.listings,
        bookings: cli.bookings,
        reviews: cli.reviews,
    };
    let report = Seeder::new(cli.seed, today).run(&pool, counts).await?;

    log::info!(
        "Seeding complete: {} listings, {} bookings, {} reviews",
        report.listings,
        report.bookings,
        report.reviews
    );
    Ok(())
}
