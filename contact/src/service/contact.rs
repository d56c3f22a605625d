use common::{
    context::Context,
    entities::contact_message::{ContactMessage, CreateContactMessage},
    error::{self, InnerError, OuterError},
    notify,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Raw submission, JSON or form-encoded. Every field is optional here so
/// that missing ones produce the validation error instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    /// Honeypot. Hidden from people, so anything in it means a bot.
    #[schema(value_type = Option<String>)]
    pub trap: Option<Value>,
}

impl ContactForm {
    pub fn is_bot(&self) -> bool {
        self.trap.as_ref().map_or(false, is_truthy)
    }

    /// The draft to store, or `None` when a required field is absent or empty.
    pub fn into_draft(self) -> Option<CreateContactMessage> {
        fn present(field: Option<String>) -> Option<String> {
            field.filter(|value| !value.is_empty())
        }

        Some(CreateContactMessage {
            name: present(self.name)?,
            email: present(self.email)?,
            subject: present(self.subject)?,
            message: present(self.message)?,
        })
    }
}

/// Loose truthiness: `null`, `false`, `0` and `""` are the only falsy values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub struct ContactService {
    pub context: Context,
}

impl ContactService {
    pub fn new(context: Context) -> ContactService {
        ContactService { context }
    }

    /// Validates and stores a submission, then hands the stored record to
    /// the notifier in the background.
    pub async fn submit(&self, form: ContactForm) -> error::Result<ContactMessage> {
        if form.is_bot() {
            log::info!("Honeypot field filled, submission blocked");
            return Err(OuterError::FormBlocked.into());
        }

        let Some(draft) = form.into_draft() else {
            return Err(OuterError::MissingFields.into());
        };

        let messages = self.context.try_get_repository::<ContactMessage>()?;

        let stored = messages.insert(&draft).await.map_err(|err| {
            log::error!("Error saving contact message: {:#}", err);
            InnerError::Persistence(err)
        })?;
        log::info!("Saved contact message {}", stored.id);

        notify::dispatch(self.context.notifier(), stored.clone());

        Ok(stored)
    }
}
