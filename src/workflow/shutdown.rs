use crate::errors::{ErrorKind, Result};
use crate::model::{Job, JobPayload, LifecycleStatus, StatusEntry, WebsiteRecord};
use crate::workflow::Services;

pub const CANCEL_FAILED: &str = "Failed to cancel RoamJS Site subscription";
pub const NO_WEBSITE: &str = "No website is associated with this user";

/// Cancels the caller's site subscription, then records the shutdown, clears
/// the website association and dispatches the `shutdown` job. Returns the
/// association as it was before it was cleared.
pub async fn shutdown_website(services: &Services, authorization: Option<&str>) -> Result<WebsiteRecord> {
    let website = services
        .metadata
        .website(authorization)
        .await?
        .ok_or_else(|| ErrorKind::NotFound(NO_WEBSITE.to_string()))?;

    // A missing subscription id is forwarded to cancellation as is.
    let subscription = services.billing.subscription(authorization, &services.product).await?;
    if !services.billing.cancel(authorization, &subscription).await? {
        warn!(
            graph = %website.graph,
            subscription = ?subscription.subscription_id,
            "subscription cancellation refused, halting shutdown"
        );
        return Err(ErrorKind::Dependency(CANCEL_FAILED.to_string()).into());
    }

    let entry = StatusEntry::new(&website.graph, LifecycleStatus::ShuttingDown);
    services.statuses.append(&entry).await?;
    info!(graph = %website.graph, id = %entry.id, status = %entry.status, "shutdown recorded");

    services.metadata.set_website(authorization, None).await?;

    let payload = JobPayload {
        roam_graph: website.graph.clone(),
    };
    services.jobs.dispatch(Job::Shutdown, &payload).await?;

    Ok(website)
}
