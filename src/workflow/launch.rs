use crate::errors::{ErrorKind, Result};
use crate::model::{Job, JobPayload, LaunchRequest, LifecycleStatus, StatusEntry, WebsiteRecord};
use crate::workflow::Services;

pub const GRAPH_REQUIRED: &str = "Roam Graph is required";

/// Records the launch, stores the website association for the caller and
/// dispatches the `launch` job. The target url is stored unvalidated.
pub async fn launch_website(
    services: &Services,
    authorization: Option<&str>,
    request: LaunchRequest,
) -> Result<WebsiteRecord> {
    let graph = match request.graph {
        Some(graph) if !graph.is_empty() => graph,
        _ => return Err(ErrorKind::Validation(GRAPH_REQUIRED.to_string()).into()),
    };

    let entry = StatusEntry::new(&graph, LifecycleStatus::Initializing);
    services.statuses.append(&entry).await?;
    info!(graph = %graph, id = %entry.id, status = %entry.status, "launch recorded");

    let website = WebsiteRecord { graph, url: request.url };
    services.metadata.set_website(authorization, Some(&website)).await?;
    info!(graph = %website.graph, url = ?website.url, "website association stored");

    let payload = JobPayload {
        roam_graph: website.graph.clone(),
    };
    services.jobs.dispatch(Job::Launch, &payload).await?;

    Ok(website)
}
