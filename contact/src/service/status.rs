use chrono::{DateTime, Utc};
use common::{context::Context, entities::contact_message::ContactMessage};

pub struct StatusService {
    pub context: Context,
}

impl StatusService {
    pub fn new(context: Context) -> StatusService {
        StatusService { context }
    }

    /// Clock of the store, which doubles as a connectivity check.
    pub async fn database_time(&self) -> anyhow::Result<DateTime<Utc>> {
        let messages = self
            .context
            .get_repository::<ContactMessage>()
            .ok_or_else(|| anyhow::anyhow!("Contact message repository not registered"))?;
        messages.health_check().await
    }
}
