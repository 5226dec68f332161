//! Website lifecycle workflows.
//!
//! Each workflow is a fixed, strictly sequential series of calls against the
//! collaborators in [`Services`]. There is no rollback: when a step fails the
//! effects of earlier steps stay in place and the error is returned as is.

use std::sync::Arc;

use crate::config::Settings;
use crate::services::dynamo::DynamoStatusStore;
use crate::services::floss::FlossClient;
use crate::services::invoker::LambdaJobInvoker;
use crate::services::{Billing, JobInvoker, StatusStore, UserMetadata};

mod launch;
mod shutdown;

pub use self::launch::{launch_website, GRAPH_REQUIRED};
pub use self::shutdown::{shutdown_website, CANCEL_FAILED, NO_WEBSITE};

/// Shared, read-only handles to every collaborator a workflow may call.
#[derive(Clone)]
pub struct Services {
    pub statuses: Arc<dyn StatusStore>,
    pub metadata: Arc<dyn UserMetadata>,
    pub billing: Arc<dyn Billing>,
    pub jobs: Arc<dyn JobInvoker>,
    /// Billing product whose subscription is cancelled on shutdown.
    pub product: String,
}

impl Services {
    /// Production collaborators: DynamoDB, the FLOSS API and Lambda.
    pub async fn connect(settings: &Settings) -> Services {
        let aws = aws_config::load_from_env().await;
        let floss = Arc::new(FlossClient::new(reqwest::Client::new(), settings.floss_api_url.clone()));

        Services {
            statuses: Arc::new(DynamoStatusStore::new(
                aws_sdk_dynamodb::Client::new(&aws),
                settings.status_table.clone(),
            )),
            metadata: floss.clone(),
            billing: floss,
            jobs: Arc::new(LambdaJobInvoker::new(
                aws_sdk_lambda::Client::new(&aws),
                settings.launch_function.clone(),
                settings.shutdown_function.clone(),
            )),
            product: settings.product_name.clone(),
        }
    }
}
