use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::entities::contact_message::ContactMessage;

use super::Notifier;

/// Records what it was asked to deliver instead of delivering it.
#[derive(Default)]
pub struct TestNotifier {
    delivered: Mutex<Vec<ContactMessage>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl TestNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose transport is down.
    pub fn failing() -> Self {
        let notifier = Self::new();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    /// Number of delivery attempts, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Ids of the messages delivered successfully.
    pub fn sent(&self) -> Vec<i32> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|message| message.id)
            .collect()
    }

    pub fn delivered(&self) -> Vec<ContactMessage> {
        self.delivered.lock().unwrap().clone()
    }

    /// Yields until `count` delivery attempts have finished. Returns `false`
    /// if that does not happen within a few seconds.
    pub async fn wait_for_calls(&self, count: usize) -> bool {
        let attempts = async {
            while self.calls() < count {
                actix_web::rt::task::yield_now().await;
            }
        };
        actix_web::rt::time::timeout(Duration::from_secs(5), attempts)
            .await
            .is_ok()
    }
}

#[async_trait]
impl Notifier for TestNotifier {
    fn name(&self) -> &'static str {
        "test"
    }

    async fn notify(&self, message: &ContactMessage) -> anyhow::Result<()> {
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(anyhow!("mail server unavailable"))
        } else {
            self.delivered.lock().unwrap().push(message.clone());
            Ok(())
        };
        self.calls.fetch_add(1, Ordering::SeqCst);
        result
    }
}
