pub mod cors;
pub mod handlers;
pub mod service;
pub mod watchdog;

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::{JsonPayloadError, UrlencodedError},
    middleware, web, App, HttpRequest,
};
use common::{
    context::ServiceState,
    error::{Error, OuterError},
};
use utoipa::OpenApi;

use handlers::{
    contact::{post_contact, SubmitResponse},
    openapi::openapi_json,
    status::{ping, status},
};
use service::contact::ContactForm;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::status::status,
        handlers::status::ping,
        handlers::contact::post_contact,
    ),
    components(schemas(
        ContactForm,
        SubmitResponse,
        common::entities::contact_message::ContactMessage,
        common::error::ErrorResponse,
    ))
)]
pub struct ApiDoc;

pub fn create_app(
    state: Arc<ServiceState>,
    allowed_origins: Arc<Vec<String>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    #[allow(clippy::let_and_return)]
    let app = App::new()
        .wrap(cors::allow_list(allowed_origins))
        .wrap(middleware::Logger::default())
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::FormConfig::default().error_handler(form_error))
        .service(status)
        .service(ping)
        .service(post_contact)
        .service(openapi_json);
    app
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON payload: {}", err);
    Error::from(OuterError::MalformedPayload).into()
}

fn form_error(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected form payload: {}", err);
    Error::from(OuterError::MalformedPayload).into()
}
