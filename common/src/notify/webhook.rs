use anyhow::Context as _;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{config::WebhookConfig, entities::contact_message::ContactMessage};

use super::Notifier;

/// Delegated delivery: the submission is posted to an external service
/// that owns the actual emailing.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<&ContactMessage> for WebhookPayload {
    fn from(message: &ContactMessage) -> Self {
        Self {
            name: message.name.clone(),
            email: message.email.clone(),
            subject: message.subject.clone(),
            message: message.message.clone(),
            submitted_at: message.submitted_at,
        }
    }
}

impl WebhookNotifier {
    pub fn new(config: &WebhookConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, message: &ContactMessage) -> anyhow::Result<()> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&WebhookPayload::from(message));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .await
            .context("Notification endpoint unreachable")?
            .error_for_status()
            .context("Notification endpoint rejected the message")?;
        Ok(())
    }
}
