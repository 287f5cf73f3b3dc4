//! hello-cloud-function: an HTTP cloud function and the host that serves it.
//!
//! The `HelloWorld` function answers every request with a fixed greeting.
//! The rest of the crate is the invocation host: a registry of named
//! functions, a router binding the selected function to every path, and an
//! HTTP server with graceful shutdown, configured the way function
//! containers are (`PORT`, `FUNCTION_TARGET`).

pub mod config;
pub mod error;
pub mod functions;
pub mod http;
pub mod middleware;
pub mod registry;
pub mod routes;

pub use error::AppError;
pub use registry::{FunctionRegistry, RegistryError};
