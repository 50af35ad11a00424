use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{ListingFilter, ListingInput};
use crate::services::listings;

pub async fn get_listings(
    pool: web::Data<SqlitePool>,
    params: web::Query<ListingFilter>,
) -> Result<HttpResponse, AppError> {
    let listings = listings::list_listings(pool.get_ref(), &params).await?;
    Ok(HttpResponse::Ok().json(listings))
}

pub async fn get_listing_by_id(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let listing = listings::get_listing(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn create_listing(
    pool: web::Data<SqlitePool>,
    body: web::Json<ListingInput>,
) -> Result<HttpResponse, AppError> {
    let listing = listings::create_listing(pool.get_ref(), &body).await?;
    Ok(HttpResponse::Created().json(listing))
}

pub async fn update_listing(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<ListingInput>,
) -> Result<HttpResponse, AppError> {
    let listing = listings::update_listing(pool.get_ref(), path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn delete_listing(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    listings::delete_listing(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
