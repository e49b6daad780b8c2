pub mod auth;
pub mod company;

use actix_web::HttpResponse;

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}
