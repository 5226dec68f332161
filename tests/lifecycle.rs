use std::sync::Arc;

use lambda_http::http::{self, StatusCode};
use lambda_http::{Body, Request};

use roamjs_lifecycle::errors::ErrorKind;
use roamjs_lifecycle::model::{Job, JobPayload, LaunchRequest, LifecycleStatus, WebsiteRecord};
use roamjs_lifecycle::services::memory::{MemoryBilling, MemoryJobInvoker, MemoryStatusStore, MemoryUserMetadata};
use roamjs_lifecycle::workflow::{self, Services, CANCEL_FAILED, GRAPH_REQUIRED, NO_WEBSITE};

const TOKEN: &str = "Bearer user-1";

struct Harness {
    statuses: Arc<MemoryStatusStore>,
    metadata: Arc<MemoryUserMetadata>,
    billing: Arc<MemoryBilling>,
    jobs: Arc<MemoryJobInvoker>,
}

impl Harness {
    fn new(metadata: MemoryUserMetadata, billing: MemoryBilling) -> Harness {
        Harness {
            statuses: Arc::new(MemoryStatusStore::default()),
            metadata: Arc::new(metadata),
            billing: Arc::new(billing),
            jobs: Arc::new(MemoryJobInvoker::default()),
        }
    }

    fn empty() -> Harness {
        Harness::new(MemoryUserMetadata::default(), MemoryBilling::default())
    }

    fn with_site(billing: MemoryBilling) -> Harness {
        Harness::new(MemoryUserMetadata::with_website(TOKEN, site()), billing)
    }

    fn services(&self) -> Services {
        Services {
            statuses: self.statuses.clone(),
            metadata: self.metadata.clone(),
            billing: self.billing.clone(),
            jobs: self.jobs.clone(),
            product: "RoamJS Site".to_string(),
        }
    }
}

fn site() -> WebsiteRecord {
    WebsiteRecord {
        graph: "notes".to_string(),
        url: Some("https://notes.example.com".to_string()),
    }
}

fn launch(graph: Option<&str>, url: Option<&str>) -> LaunchRequest {
    LaunchRequest {
        graph: graph.map(str::to_string),
        url: url.map(str::to_string),
    }
}

fn post(path: &str, body: &str) -> Request {
    http::Request::builder()
        .method("POST")
        .uri(path)
        .header("Authorization", TOKEN)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn body_json(body: &Body) -> serde_json::Value {
    let bytes: &[u8] = body;
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn launch_without_graph_is_rejected_without_writes() {
    for request in vec![launch(None, None), launch(Some(""), Some("https://x.example.com"))] {
        let harness = Harness::empty();

        let err = workflow::launch_website(&harness.services(), Some(TOKEN), request)
            .await
            .unwrap_err();

        match err.kind() {
            ErrorKind::Validation(msg) => assert_eq!(msg, GRAPH_REQUIRED),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.status_code(), 400);
        assert!(harness.statuses.entries().is_empty());
        assert!(harness.metadata.writes().is_empty());
        assert!(harness.jobs.dispatched().is_empty());
    }
}

#[tokio::test]
async fn launch_records_status_stores_site_and_dispatches_job() {
    let harness = Harness::empty();

    let website = workflow::launch_website(
        &harness.services(),
        Some(TOKEN),
        launch(Some("notes"), Some("https://notes.example.com")),
    )
    .await
    .unwrap();

    assert_eq!(website, site());

    let entries = harness.statuses.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action_key, "launch_notes");
    assert_eq!(entries[0].status, LifecycleStatus::Initializing);

    assert_eq!(harness.metadata.website_for(TOKEN), Some(site()));
    assert_eq!(
        harness.jobs.dispatched(),
        vec![(
            Job::Launch,
            JobPayload {
                roam_graph: "notes".to_string()
            }
        )]
    );
}

#[tokio::test]
async fn launch_failure_after_status_write_leaves_audit_entry() {
    let harness = Harness::empty();
    harness.metadata.fail_writes();

    let err = workflow::launch_website(&harness.services(), Some(TOKEN), launch(Some("notes"), None))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert_eq!(harness.statuses.entries().len(), 1);
    assert!(harness.jobs.dispatched().is_empty());
}

// No per-graph lock exists: both launches go through and both jobs dispatch.
#[tokio::test]
async fn concurrent_launches_for_same_graph_both_succeed() {
    let harness = Harness::empty();
    let services = harness.services();

    let (first, second) = tokio::join!(
        workflow::launch_website(&services, Some(TOKEN), launch(Some("notes"), None)),
        workflow::launch_website(&services, Some(TOKEN), launch(Some("notes"), Some("https://b.example.com"))),
    );

    assert!(first.is_ok());
    assert!(second.is_ok());

    let entries = harness.statuses.entries();
    assert_eq!(entries.len(), 2);
    assert_ne!(entries[0].id, entries[1].id);
    assert_eq!(harness.jobs.dispatched().len(), 2);
}

#[tokio::test]
async fn shutdown_returns_record_read_before_clearing() {
    let harness = Harness::with_site(MemoryBilling::with_subscription(Some("sub_42")));

    let website = workflow::shutdown_website(&harness.services(), Some(TOKEN))
        .await
        .unwrap();

    assert_eq!(website, site());
    assert_eq!(harness.metadata.website_for(TOKEN), None);
    assert_eq!(harness.metadata.writes(), vec![(TOKEN.to_string(), None)]);

    let cancellations = harness.billing.cancellations();
    assert_eq!(cancellations.len(), 1);
    assert_eq!(cancellations[0].subscription_id.as_deref(), Some("sub_42"));

    let entries = harness.statuses.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action_key, "launch_notes");
    assert_eq!(entries[0].status, LifecycleStatus::ShuttingDown);

    assert_eq!(
        harness.jobs.dispatched(),
        vec![(
            Job::Shutdown,
            JobPayload {
                roam_graph: "notes".to_string()
            }
        )]
    );
}

#[tokio::test]
async fn refused_cancellation_halts_shutdown() {
    let harness = Harness::with_site(MemoryBilling::default().refusing_cancellation());

    let err = workflow::shutdown_website(&harness.services(), Some(TOKEN))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert_eq!(err.to_string(), CANCEL_FAILED);
    assert_eq!(harness.metadata.website_for(TOKEN), Some(site()));
    assert!(harness.metadata.writes().is_empty());
    assert!(harness.statuses.entries().is_empty());
    assert!(harness.jobs.dispatched().is_empty());
}

#[tokio::test]
async fn shutdown_without_subscription_still_attempts_cancellation() {
    let harness = Harness::with_site(MemoryBilling::with_subscription(None));

    workflow::shutdown_website(&harness.services(), Some(TOKEN))
        .await
        .unwrap();

    let cancellations = harness.billing.cancellations();
    assert_eq!(cancellations.len(), 1);
    assert_eq!(cancellations[0].subscription_id, None);
}

#[tokio::test]
async fn shutdown_without_site_is_not_found() {
    let harness = Harness::empty();

    let err = workflow::shutdown_website(&harness.services(), Some(TOKEN))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), NO_WEBSITE);
    assert!(harness.billing.cancellations().is_empty());
}

#[tokio::test]
async fn http_launch_echoes_submitted_record() {
    let harness = Harness::empty();

    let response = roamjs_lifecycle::http::handle(
        &harness.services(),
        post("/launch-website", r#"{"graph":"notes","url":"https://notes.example.com"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.body()),
        serde_json::json!({"graph": "notes", "url": "https://notes.example.com"})
    );
    assert_eq!(harness.metadata.website_for(TOKEN), Some(site()));
}

#[tokio::test]
async fn http_maps_workflow_errors_to_status_codes() {
    let harness = Harness::empty();
    let services = harness.services();

    let missing = roamjs_lifecycle::http::handle(&services, post("/launch-website", "{}")).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing.body()), serde_json::json!(GRAPH_REQUIRED));

    let refused = Harness::with_site(MemoryBilling::default().refusing_cancellation());
    let response = roamjs_lifecycle::http::handle(&refused.services(), post("/dev/shutdown-website", "")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response.body()), serde_json::json!(CANCEL_FAILED));

    let get = http::Request::builder()
        .method("GET")
        .uri("/launch-website")
        .body(Body::Empty)
        .unwrap();
    let response = roamjs_lifecycle::http::handle(&services, get).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");

    let unknown = roamjs_lifecycle::http::handle(&services, post("/website-status", "{}")).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}
