use lambda_http::{service_fn, Error as LambdaError, Request};

use roamjs_lifecycle::config::SETTINGS;
use roamjs_lifecycle::workflow::Services;
use roamjs_lifecycle::{http, logging};

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    logging::init(&SETTINGS);
    let services = Services::connect(&SETTINGS).await;
    let services = &services;

    lambda_http::run(service_fn(move |request: Request| async move {
        Ok::<_, LambdaError>(http::handle(services, request).await)
    }))
    .await
}
