use actix_web::{middleware, web, App, HttpServer};
use env_logger::Env;

use listings_api::config::Config;
use listings_api::{db, handlers};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env()?;

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config).await?;

    log::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let pool_data = web::Data::new(pool);

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
