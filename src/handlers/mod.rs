pub mod bookings;
pub mod listings;
pub mod reviews;

use actix_web::error::InternalError;
use actix_web::{web, HttpResponse, ResponseError};

use crate::error::{AppError, FieldErrors, ValidationKind};

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = AppError::from(FieldErrors::single(
            "body",
            ValidationKind::Invalid,
            err.to_string(),
        ));
        InternalError::from_response(err, body.error_response()).into()
    })
}

/// Mounts every route on the app; shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .service(
            web::scope("/listings")
                .route("", web::get().to(listings::get_listings))
                .route("", web::post().to(listings::create_listing))
                .route("/{id}", web::get().to(listings::get_listing_by_id))
                .route("/{id}", web::put().to(listings::update_listing))
                .route("/{id}", web::delete().to(listings::delete_listing)),
        )
        .service(
            web::scope("/bookings")
                .route("", web::get().to(bookings::get_bookings))
                .route("", web::post().to(bookings::create_booking))
                .route("/{id}", web::get().to(bookings::get_booking))
                .route("/{id}", web::put().to(bookings::update_booking))
                .route("/{id}", web::delete().to(bookings::delete_booking)),
        )
        .service(
            web::scope("/reviews")
                .route("", web::get().to(reviews::get_reviews))
                .route("", web::post().to(reviews::create_review))
                .route("/{id}", web::get().to(reviews::get_review))
                .route("/{id}", web::put().to(reviews::update_review))
                .route("/{id}", web::delete().to(reviews::delete_review)),
        );
}
