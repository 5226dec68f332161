//! In-memory collaborators that record every call. Used by the tests and by
//! the local runner's `--dry-run` mode.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::{ErrorKind, Result};
use crate::model::{Job, JobPayload, StatusEntry, Subscription, WebsiteRecord};
use crate::services::{Billing, JobInvoker, StatusStore, UserMetadata};

/// Key used for callers that send no `Authorization` header.
const ANONYMOUS: &str = "";

#[derive(Default)]
pub struct MemoryStatusStore {
    entries: Mutex<Vec<StatusEntry>>,
}

impl MemoryStatusStore {
    pub fn entries(&self) -> Vec<StatusEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn append(&self, entry: &StatusEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserMetadata {
    websites: Mutex<HashMap<String, WebsiteRecord>>,
    writes: Mutex<Vec<(String, Option<WebsiteRecord>)>>,
    failing: Mutex<bool>,
}

impl MemoryUserMetadata {
    pub fn with_website(authorization: &str, website: WebsiteRecord) -> Self {
        let metadata = MemoryUserMetadata::default();
        metadata.websites.lock().insert(authorization.to_string(), website);
        metadata
    }

    pub fn website_for(&self, authorization: &str) -> Option<WebsiteRecord> {
        self.websites.lock().get(authorization).cloned()
    }

    /// Every `set_website` call, in order.
    pub fn writes(&self) -> Vec<(String, Option<WebsiteRecord>)> {
        self.writes.lock().clone()
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&self) {
        *self.failing.lock() = true;
    }
}

#[async_trait]
impl UserMetadata for MemoryUserMetadata {
    async fn website(&self, authorization: Option<&str>) -> Result<Option<WebsiteRecord>> {
        Ok(self.website_for(authorization.unwrap_or(ANONYMOUS)))
    }

    async fn set_website(&self, authorization: Option<&str>, website: Option<&WebsiteRecord>) -> Result<()> {
        if *self.failing.lock() {
            return Err(ErrorKind::Dependency("auth-user-metadata responded with 500".into()).into());
        }

        let key = authorization.unwrap_or(ANONYMOUS).to_string();
        let website = website.cloned();
        {
            let mut websites = self.websites.lock();
            match &website {
                Some(record) => websites.insert(key.clone(), record.clone()),
                None => websites.remove(&key),
            };
        }
        self.writes.lock().push((key, website));
        Ok(())
    }
}

pub struct MemoryBilling {
    subscription_id: Option<String>,
    cancel_succeeds: bool,
    cancelled: Mutex<Vec<Subscription>>,
}

impl Default for MemoryBilling {
    fn default() -> Self {
        MemoryBilling {
            subscription_id: Some("sub_memory".to_string()),
            cancel_succeeds: true,
            cancelled: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryBilling {
    pub fn with_subscription(subscription_id: Option<&str>) -> Self {
        MemoryBilling {
            subscription_id: subscription_id.map(str::to_string),
            ..MemoryBilling::default()
        }
    }

    /// Cancellation requests will report `success: false`.
    pub fn refusing_cancellation(mut self) -> Self {
        self.cancel_succeeds = false;
        self
    }

    pub fn cancellations(&self) -> Vec<Subscription> {
        self.cancelled.lock().clone()
    }
}

#[async_trait]
impl Billing for MemoryBilling {
    async fn subscription(&self, _authorization: Option<&str>, _product: &str) -> Result<Subscription> {
        Ok(Subscription {
            subscription_id: self.subscription_id.clone(),
        })
    }

    async fn cancel(&self, _authorization: Option<&str>, subscription: &Subscription) -> Result<bool> {
        self.cancelled.lock().push(subscription.clone());
        Ok(self.cancel_succeeds)
    }
}

#[derive(Default)]
pub struct MemoryJobInvoker {
    dispatched: Mutex<Vec<(Job, JobPayload)>>,
}

impl MemoryJobInvoker {
    pub fn dispatched(&self) -> Vec<(Job, JobPayload)> {
        self.dispatched.lock().clone()
    }
}

#[async_trait]
impl JobInvoker for MemoryJobInvoker {
    async fn dispatch(&self, job: Job, payload: &JobPayload) -> Result<()> {
        self.dispatched.lock().push((job, payload.clone()));
        Ok(())
    }
}
