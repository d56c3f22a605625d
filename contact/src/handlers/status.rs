use actix_web::{get, http::header::ContentType, HttpResponse};
use common::context::Context;

use crate::service::status::StatusService;

#[utoipa::path(
    responses(
        (status = 200, description = "Service and database are up", body = String),
        (status = 500, description = "Database unreachable", body = String)
    )
)]
#[get("/")]
pub async fn status(context: Context) -> HttpResponse {
    match StatusService::new(context).database_time().await {
        Ok(now) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(format!(
                "Contact Backend API is running! DB Time: {}",
                now.to_rfc3339()
            )),
        Err(err) => {
            log::error!("Database connection error on GET /: {:#}", err);
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Contact Backend API is running, but database connection failed.")
        }
    }
}

#[utoipa::path(
    responses(
        (status = 200, description = "Process is alive")
    )
)]
#[get("/api/contact/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().finish()
}
