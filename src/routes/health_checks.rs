use crate::helpers::JsonResponse;
use actix_web::{get, HttpResponse, Responder};

#[get("")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

#[get("/")]
pub async fn index() -> impl Responder {
    JsonResponse::<()>::build().ok("Welcome to User Management API")
}

/// Default service for unknown routes.
pub async fn not_found() -> HttpResponse {
    JsonResponse::<()>::build().respond(
        actix_web::http::StatusCode::NOT_FOUND,
        "Endpoint not found",
    )
}
