use std::time::Instant;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::app::errors::ApiError;

/// Turn the router's bare `405` into a `400` that names the method.
pub async fn method_not_supported(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let response = next.run(req).await;

    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return ApiError::bad_request(format!("{method} method is not supported")).into_response();
    }
    response
}

pub async fn trace_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}
