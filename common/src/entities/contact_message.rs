use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::repository::Entity;

/// A stored submission. `id` and `submitted_at` always come from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ContactMessage {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl Entity for ContactMessage {
    type Draft = CreateContactMessage;
}

/// User-supplied fields of a submission that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
