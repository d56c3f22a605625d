use actix_web::{get, web::Json};
use utoipa::OpenApi;

use crate::ApiDoc;

#[get("/api-docs/openapi.json")]
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
