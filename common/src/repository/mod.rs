pub mod postgres_repository;
pub mod test_repository;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub trait Entity: Send + Sync {
    /// Fields the caller provides before the store assigns identity.
    type Draft: Send + Sync;
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Inserts the draft and returns the full row, store-assigned fields
    /// included.
    async fn insert(&self, item: &T::Draft) -> anyhow::Result<T>;

    /// Round trip to the store, returning its clock.
    async fn health_check(&self) -> anyhow::Result<DateTime<Utc>>;
}

pub type RepositoryObject<T> = Arc<dyn Repository<T>>;
