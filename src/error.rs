use std::any::Any;

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::ConfigError;
use crate::http::ServerError;
use crate::registry::RegistryError;

/// Body sent when a function panics
pub const PANIC_RESPONSE_BODY: &str = "Internal server error\n";

/// Startup and serving failures of the host process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Convert a caught function panic into a 500 response.
///
/// The panic payload is logged; the client only sees a generic message.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "Function panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, PANIC_RESPONSE_BODY).into_response()
}
