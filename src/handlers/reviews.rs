use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{ReviewFilter, ReviewInput};
use crate::services::reviews;

pub async fn get_reviews(
    pool: web::Data<SqlitePool>,
    params: web::Query<ReviewFilter>,
) -> Result<HttpResponse, AppError> {
    let reviews = reviews::list_reviews(pool.get_ref(), &params).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

pub async fn get_review(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let review = reviews::get_review(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(review))
}

pub async fn create_review(
    pool: web::Data<SqlitePool>,
    body: web::Json<ReviewInput>,
) -> Result<HttpResponse, AppError> {
    let review = reviews::create_review(pool.get_ref(), &body).await?;
    Ok(HttpResponse::Created().json(review))
}

pub async fn update_review(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<ReviewInput>,
) -> Result<HttpResponse, AppError> {
    let review = reviews::update_review(pool.get_ref(), path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(review))
}

pub async fn delete_review(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    reviews::delete_review(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
