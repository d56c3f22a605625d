use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use anyhow::bail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::contact_message::{ContactMessage, CreateContactMessage};

use super::Repository;

/// In-memory store that hands out sequential ids and wall-clock timestamps
/// the way the database would.
#[derive(Default)]
pub struct TestRepository {
    pub db: Mutex<Vec<ContactMessage>>,
    failing: AtomicBool,
    insert_calls: AtomicUsize,
    health_script: Mutex<VecDeque<bool>>,
    health_checks: AtomicUsize,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that is unreachable from the start.
    pub fn failing() -> Self {
        let repository = Self::new();
        repository.set_failing(true);
        repository
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of insert attempts, failed ones included.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Queues outcomes for the next health checks, `true` meaning healthy.
    /// Once the queue runs out the failing flag decides again.
    pub fn script_health(&self, outcomes: impl IntoIterator<Item = bool>) {
        self.health_script.lock().unwrap().extend(outcomes);
    }

    pub fn health_checks(&self) -> usize {
        self.health_checks.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<ContactMessage> {
        self.db.lock().unwrap().clone()
    }
}

#[async_trait]
impl Repository<ContactMessage> for TestRepository {
    async fn insert(&self, item: &CreateContactMessage) -> anyhow::Result<ContactMessage> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            bail!("connection refused");
        }

        let mut db = self.db.lock().unwrap();
        let message = ContactMessage {
            id: db.len() as i32 + 1,
            name: item.name.clone(),
            email: item.email.clone(),
            subject: item.subject.clone(),
            message: item.message.clone(),
            submitted_at: Utc::now(),
        };
        db.push(message.clone());
        Ok(message)
    }

    async fn health_check(&self) -> anyhow::Result<DateTime<Utc>> {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        let healthy = self
            .health_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| !self.failing.load(Ordering::SeqCst));
        if !healthy {
            bail!("connection refused");
        }
        Ok(Utc::now())
    }
}
