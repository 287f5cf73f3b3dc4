//! Functions this deployment exposes.
//!
//! Each function lives in its own module and is added to the registry by
//! [`register`] at process start.

pub mod hello_world;

use crate::registry::{FunctionRegistry, RegistryError};

/// Register every function under its symbolic name.
pub fn register(registry: &mut FunctionRegistry) -> Result<(), RegistryError> {
    registry.http(hello_world::NAME, hello_world::hello_world)?;
    Ok(())
}
