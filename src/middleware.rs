//! Request ID middleware for correlating logs with invocations.
//!
//! Generates a UUID v4 for each incoming request and creates a tracing span
//! that wraps the whole invocation. All logs emitted while the function runs
//! carry the `request_id` and `function` fields. Nothing is added to the
//! response.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Extension type for accessing the request ID inside a function if needed.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Name of the function being served, recorded on every request span.
#[derive(Clone, Debug)]
pub struct FunctionName(pub Arc<str>);

impl FunctionName {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost layer so the span also covers panic
/// recovery.
pub async fn request_id_layer(
    State(function): State<FunctionName>,
    mut request: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        function = %function.0,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    request.extensions_mut().insert(RequestId(request_id));

    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}
