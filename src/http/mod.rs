//! HTTP server module.
//!
//! Serves the function router on the configured address and drains in-flight
//! invocations on SIGTERM/SIGINT. TLS is terminated by the platform in front
//! of the container, so the server speaks plain HTTP.

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
