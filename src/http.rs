//! API Gateway front door: routes proxy requests to the workflows and turns
//! their results into JSON responses.

use lambda_http::http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use lambda_http::http::{Method, StatusCode};
use lambda_http::{Body, Request, Response};
use serde::Serialize;

use crate::errors::{Error, ErrorKind, Result};
use crate::model::LaunchRequest;
use crate::workflow::{self, Services};

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS"),
    ("Access-Control-Allow-Headers", "Authorization, Content-Type"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    LaunchWebsite,
    ShutdownWebsite,
}

impl Route {
    /// Matches on the final path segment so stage prefixes are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        match path.trim_end_matches('/').rsplit('/').next() {
            Some("launch-website") => Some(Route::LaunchWebsite),
            Some("shutdown-website") => Some(Route::ShutdownWebsite),
            _ => None,
        }
    }
}

pub async fn handle(services: &Services, request: Request) -> Response<Body> {
    let route = match Route::from_path(request.uri().path()) {
        Some(route) => route,
        None => return message(StatusCode::NOT_FOUND, "Not Found"),
    };

    if request.method() == Method::OPTIONS {
        return respond(StatusCode::OK, Body::Empty);
    }
    if request.method() != Method::POST {
        return message(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    }

    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let result = match route {
        Route::LaunchWebsite => match launch_request(request.body()) {
            Ok(body) => workflow::launch_website(services, authorization.as_deref(), body).await,
            Err(e) => Err(e),
        },
        Route::ShutdownWebsite => workflow::shutdown_website(services, authorization.as_deref()).await,
    };

    match result {
        Ok(website) => json(StatusCode::OK, &website),
        Err(e) => failure(route, &e),
    }
}

/// Empty bodies are treated as `{}` so they fail validation, not parsing.
fn launch_request(body: &Body) -> Result<LaunchRequest> {
    let bytes: &[u8] = body;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(LaunchRequest::default());
    }
    serde_json::from_slice(bytes).map_err(|e| ErrorKind::Validation(format!("Invalid request body: {}", e)).into())
}

fn failure(route: Route, error: &Error) -> Response<Body> {
    let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(?route, error = %error, "workflow failed");
    } else {
        info!(?route, error = %error, "request rejected");
    }
    message(status, &error.to_string())
}

fn message(status: StatusCode, text: &str) -> Response<Body> {
    json(status, &text)
}

fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_string(value) {
        Ok(body) => respond(status, Body::Text(body)),
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty)
        }
    }
}

fn respond(status: StatusCode, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in CORS_HEADERS.iter() {
        headers.insert(*name, HeaderValue::from_static(*value));
    }
    response
}
