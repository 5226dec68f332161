use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_lambda::Client;

use crate::errors::{dependency, Result};
use crate::model::{Job, JobPayload};
use crate::services::JobInvoker;

/// Dispatches jobs as asynchronous (`Event`) Lambda invocations.
pub struct LambdaJobInvoker {
    client: Client,
    launch_function: String,
    shutdown_function: String,
}

impl LambdaJobInvoker {
    pub fn new(client: Client, launch_function: impl Into<String>, shutdown_function: impl Into<String>) -> Self {
        LambdaJobInvoker {
            client,
            launch_function: launch_function.into(),
            shutdown_function: shutdown_function.into(),
        }
    }

    pub fn function_name(&self, job: Job) -> &str {
        match job {
            Job::Launch => &self.launch_function,
            Job::Shutdown => &self.shutdown_function,
        }
    }
}

#[async_trait]
impl JobInvoker for LambdaJobInvoker {
    async fn dispatch(&self, job: Job, payload: &JobPayload) -> Result<()> {
        let function = self.function_name(job);
        let body = serde_json::to_vec(payload)?;

        let output = self
            .client
            .invoke()
            .function_name(function)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|e| dependency("failed to dispatch background job", DisplayErrorContext(&e)))?;

        info!(job = job.name(), function, status = output.status_code(), "background job dispatched");
        Ok(())
    }
}
