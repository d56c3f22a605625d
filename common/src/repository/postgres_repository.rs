use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::DatabaseConfig,
    entities::contact_message::{ContactMessage, CreateContactMessage},
};

use super::Repository;

const INSERT_CONTACT_MESSAGE: &str = r"
    INSERT INTO contact_messages (name, email, subject, message)
    VALUES ($1, $2, $3, $4)
    RETURNING id, name, email, subject, message, submitted_at
";

pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the pool and checks out one connection, so a wrong URL or an
    /// unreachable server fails here instead of on the first request.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .test_before_acquire(true)
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Repository<ContactMessage> for PostgresRepository {
    async fn insert(&self, item: &CreateContactMessage) -> anyhow::Result<ContactMessage> {
        let message = sqlx::query_as::<_, ContactMessage>(INSERT_CONTACT_MESSAGE)
            .bind(&item.name)
            .bind(&item.email)
            .bind(&item.subject)
            .bind(&item.message)
            .fetch_one(&self.pool)
            .await?;
        Ok(message)
    }

    async fn health_check(&self) -> anyhow::Result<DateTime<Utc>> {
        let (now,): (DateTime<Utc>,) = sqlx::query_as("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }
}
