use actix_web::{
    post,
    web::{self, Either},
    HttpResponse,
};
use common::{
    context::Context,
    entities::contact_message::ContactMessage,
    error::{self, ErrorResponse},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::contact::{ContactForm, ContactService};

pub const SUBMITTED: &str = "Contact form submitted successfully!";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    pub message: String,
    pub data: ContactMessage,
}

#[utoipa::path(
    request_body(
        content = ContactForm
    ),
    responses(
        (status = 201, description = "Submission stored", body = SubmitResponse),
        (status = 400, description = "Missing fields, honeypot or malformed payload", body = ErrorResponse),
        (status = 500, description = "Submission could not be stored", body = ErrorResponse)
    )
)]
#[post("/api/contact")]
pub async fn post_contact(
    context: Context,
    form: Either<web::Json<ContactForm>, web::Form<ContactForm>>,
) -> error::Result<HttpResponse> {
    let form = match form {
        Either::Left(web::Json(form)) => form,
        Either::Right(web::Form(form)) => form,
    };

    let stored = ContactService::new(context).submit(form).await?;

    Ok(HttpResponse::Created().json(SubmitResponse {
        message: SUBMITTED.to_string(),
        data: stored,
    }))
}
