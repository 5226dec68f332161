use std::env;
use std::process;
use std::sync::Arc;

use serde_json::Value;

use roamjs_lifecycle::config::SETTINGS;
use roamjs_lifecycle::errors::{ErrorKind, Result};
use roamjs_lifecycle::model::{LaunchRequest, WebsiteRecord};
use roamjs_lifecycle::services::floss::FlossClient;
use roamjs_lifecycle::services::memory::{MemoryBilling, MemoryJobInvoker, MemoryStatusStore, MemoryUserMetadata};
use roamjs_lifecycle::workflow::{self, Services};
use roamjs_lifecycle::logging;

const USAGE: &str =
    "usage: roamjs-lifecycle [--dry-run] launch <graph> [url] | shutdown | projects <uuid> | projects --tenant <tenant>";

// Runs one lifecycle workflow from the command line and prints the response
// body. The caller's credential comes from ROAMJS_AUTHORIZATION.
//
// --dry-run swaps every collaborator for an in-memory one so nothing leaves
// the machine. Shutdown then acts on a pretend site for the graph "dry-run".
// The projects commands only read from the FLOSS API and ignore --dry-run.

enum Command {
    Launch(LaunchRequest),
    Shutdown,
    Project(String),
    TenantProjects(String),
}

fn parse(args: &[String]) -> Result<(bool, Command)> {
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let rest: Vec<&str> = args.iter().map(String::as_str).filter(|a| *a != "--dry-run").collect();

    let command = match rest.as_slice() {
        ["launch", graph] => Command::Launch(LaunchRequest {
            graph: Some(graph.to_string()),
            url: None,
        }),
        ["launch", graph, url] => Command::Launch(LaunchRequest {
            graph: Some(graph.to_string()),
            url: Some(url.to_string()),
        }),
        ["shutdown"] => Command::Shutdown,
        ["projects", "--tenant", tenant] => Command::TenantProjects(tenant.to_string()),
        ["projects", uuid] if !uuid.starts_with("--") => Command::Project(uuid.to_string()),
        _ => return Err(ErrorKind::Validation(USAGE.to_string()).into()),
    };
    Ok((dry_run, command))
}

fn dry_run_services(authorization: Option<&str>) -> Services {
    let metadata = MemoryUserMetadata::with_website(
        authorization.unwrap_or(""),
        WebsiteRecord {
            graph: "dry-run".to_string(),
            url: None,
        },
    );
    Services {
        statuses: Arc::new(MemoryStatusStore::default()),
        metadata: Arc::new(metadata),
        billing: Arc::new(MemoryBilling::default()),
        jobs: Arc::new(MemoryJobInvoker::default()),
        product: SETTINGS.product_name.clone(),
    }
}

async fn run(args: &[String]) -> Result<Value> {
    let (dry_run, command) = parse(args)?;
    let floss = || FlossClient::new(reqwest::Client::new(), SETTINGS.floss_api_url.clone());

    let output = match command {
        Command::Launch(request) => serde_json::to_value(lifecycle(dry_run, Some(request)).await?)?,
        Command::Shutdown => serde_json::to_value(lifecycle(dry_run, None).await?)?,
        Command::Project(uuid) => serde_json::to_value(floss().project(&uuid).await?.summary())?,
        Command::TenantProjects(tenant) => {
            let uuids: Vec<String> = floss()
                .tenant_projects(&tenant)
                .await?
                .into_iter()
                .map(|project| project.uuid)
                .collect();
            serde_json::to_value(uuids)?
        }
    };
    Ok(output)
}

/// Launches when given a request, shuts down otherwise.
async fn lifecycle(dry_run: bool, launch: Option<LaunchRequest>) -> Result<WebsiteRecord> {
    let authorization = env::var("ROAMJS_AUTHORIZATION").ok();

    let services = if dry_run {
        dry_run_services(authorization.as_deref())
    } else {
        Services::connect(&SETTINGS).await
    };

    match launch {
        Some(request) => workflow::launch_website(&services, authorization.as_deref(), request).await,
        None => workflow::shutdown_website(&services, authorization.as_deref()).await,
    }
}

#[tokio::main]
async fn main() {
    logging::init(&SETTINGS);
    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args).await {
        Ok(output) => match serde_json::to_string(&output) {
            Ok(serialized) => println!("{}", serialized),
            Err(e) => {
                eprintln!("failed to serialize: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{} ({})", e, e.status_code());
            process::exit(1);
        }
    }
}
