pub mod smtp;
pub mod test_notifier;
pub mod webhook;

use std::sync::Arc;

use actix_web::rt::task::JoinHandle;
use async_trait::async_trait;

use crate::{config::NotifyConfig, entities::contact_message::ContactMessage};

use self::{smtp::SmtpNotifier, webhook::WebhookNotifier};

/// Tells someone a submission arrived. Delivery is best effort.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn notify(&self, message: &ContactMessage) -> anyhow::Result<()>;
}

pub type NotifierObject = Arc<dyn Notifier>;

/// Stand-in when no strategy is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn notify(&self, message: &ContactMessage) -> anyhow::Result<()> {
        log::debug!(
            "Notifications disabled, nothing sent for contact message {}",
            message.id
        );
        Ok(())
    }
}

/// Builds the configured strategy. An SMTP server that fails verification
/// is only reported; the service still starts and keeps trying per message.
pub async fn from_config(config: &NotifyConfig) -> anyhow::Result<NotifierObject> {
    let notifier: NotifierObject = match config {
        NotifyConfig::Smtp(config) => {
            let notifier = SmtpNotifier::new(config)?;
            match notifier.verify().await {
                Ok(()) => log::info!("SMTP transport to {} verified", config.host),
                Err(err) => log::warn!(
                    "SMTP transport to {} failed verification, notifications may not be delivered: {:#}",
                    config.host,
                    err
                ),
            }
            Arc::new(notifier)
        }
        NotifyConfig::Webhook(config) => Arc::new(WebhookNotifier::new(config)?),
        NotifyConfig::None => {
            log::info!("No notification strategy configured, submissions are stored only");
            Arc::new(NoopNotifier)
        }
    };
    Ok(notifier)
}

/// Runs the notification in the background. The outcome is only logged, so
/// nothing here can reach the response of the request that stored `message`.
pub fn dispatch(notifier: NotifierObject, message: ContactMessage) -> JoinHandle<()> {
    actix_web::rt::spawn(async move {
        match notifier.notify(&message).await {
            Ok(()) => log::info!(
                "Notification ({}) sent for contact message {}",
                notifier.name(),
                message.id
            ),
            Err(err) => log::error!(
                "Notification ({}) failed for contact message {}: {:#}",
                notifier.name(),
                message.id,
                err
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{test_notifier::TestNotifier, *};

    fn message() -> ContactMessage {
        ContactMessage {
            id: 7,
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
            submitted_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn dispatch_delivers_the_stored_record() {
        let notifier = Arc::new(TestNotifier::new());
        dispatch(notifier.clone(), message()).await.unwrap();

        assert_eq!(notifier.sent(), vec![message().id]);
    }

    #[actix_web::test]
    async fn dispatch_swallows_failures() {
        let notifier = Arc::new(TestNotifier::failing());
        let handle = dispatch(notifier.clone(), message());

        assert!(handle.await.is_ok());
        assert_eq!(notifier.calls(), 1);
    }

    #[actix_web::test]
    async fn unconfigured_strategy_is_a_noop() {
        let notifier = from_config(&NotifyConfig::None).await.unwrap();
        assert_eq!(notifier.name(), "none");
        assert!(notifier.notify(&message()).await.is_ok());
    }
}
