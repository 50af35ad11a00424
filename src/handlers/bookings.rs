use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{BookingFilter, BookingUpdate, NewBooking};
use crate::services::bookings;

pub async fn get_bookings(
    pool: web::Data<SqlitePool>,
    params: web::Query<BookingFilter>,
) -> Result<HttpResponse, AppError> {
    let bookings = bookings::list_bookings(pool.get_ref(), &params).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// Runs the date, minimum-stay and pricing rules before anything is stored.
pub async fn create_booking(
    pool: web::Data<SqlitePool>,
    body: web::Json<NewBooking>,
) -> Result<HttpResponse, AppError> {
    let booking = bookings::create_booking(pool.get_ref(), &body).await?;
    Ok(HttpResponse::Created().json(booking))
}

pub async fn get_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let booking = bookings::get_booking(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn update_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<BookingUpdate>,
) -> Result<HttpResponse, AppError> {
    let booking = bookings::update_booking(pool.get_ref(), path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn delete_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    bookings::delete_booking(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
