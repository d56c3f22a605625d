use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    Inner(InnerError),
    Outer(OuterError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client mistakes. The display text is sent back as is.
#[derive(Debug, Display, Error)]
pub enum OuterError {
    #[display(fmt = "Form submission blocked.")]
    FormBlocked,
    #[display(fmt = "Name, email, subject, and message are required.")]
    MissingFields,
    #[display(fmt = "Invalid request payload.")]
    MalformedPayload,
}

/// Server-side failures. The cause stays in the logs, the caller only sees
/// the display text.
#[derive(Debug, Display)]
pub enum InnerError {
    #[display(fmt = "Failed to submit contact form.")]
    Persistence(anyhow::Error),
    #[display(fmt = "Internal server error.")]
    Internal(anyhow::Error),
}

impl std::error::Error for InnerError {}

impl InnerError {
    pub fn cause(&self) -> &anyhow::Error {
        match self {
            InnerError::Persistence(err) | InnerError::Internal(err) => err,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            Error::Inner(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Outer(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{body::to_bytes, http::StatusCode, ResponseError};

    use super::*;

    #[actix_web::test]
    async fn inner_errors_hide_their_cause() {
        let err = Error::from(InnerError::Persistence(anyhow::anyhow!(
            "password authentication failed for user \"contact\""
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "Failed to submit contact form.");
    }

    #[test]
    fn outer_errors_are_bad_requests() {
        let err = Error::from(OuterError::MissingFields);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Name, email, subject, and message are required."
        );
    }
}
