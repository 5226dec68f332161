//! The external collaborators the lifecycle workflows orchestrate.
//!
//! Each collaborator is a trait so the workflows can run against AWS and the
//! FLOSS API in production and against the in-memory versions in tests.

use async_trait::async_trait;

use crate::errors::Result;
use crate::model::{Job, JobPayload, StatusEntry, Subscription, WebsiteRecord};

pub mod dynamo;
pub mod floss;
pub mod invoker;
pub mod memory;

/// Append-only audit log of lifecycle transitions.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn append(&self, entry: &StatusEntry) -> Result<()>;
}

/// Per-user `website` metadata. Calls carry the caller's `Authorization`
/// header, which identifies whose record is read or written.
#[async_trait]
pub trait UserMetadata: Send + Sync {
    async fn website(&self, authorization: Option<&str>) -> Result<Option<WebsiteRecord>>;

    /// `None` clears the association.
    async fn set_website(&self, authorization: Option<&str>, website: Option<&WebsiteRecord>) -> Result<()>;
}

#[async_trait]
pub trait Billing: Send + Sync {
    async fn subscription(&self, authorization: Option<&str>, product: &str) -> Result<Subscription>;

    /// Returns the service's own success flag; transport failures are errors.
    async fn cancel(&self, authorization: Option<&str>, subscription: &Subscription) -> Result<bool>;
}

/// Dispatches a background job. Returns once the dispatch is accepted, not
/// when the job finishes.
#[async_trait]
pub trait JobInvoker: Send + Sync {
    async fn dispatch(&self, job: Job, payload: &JobPayload) -> Result<()>;
}
