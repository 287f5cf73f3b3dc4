//! Named registry of HTTP functions.
//!
//! Functions are registered under a symbolic name at startup. The host then
//! resolves exactly one of them (usually from `FUNCTION_TARGET`) and binds it
//! to every path and method. The registry is read-only once serving starts.

use std::collections::BTreeMap;

use axum::handler::Handler;
use axum::routing::{any, MethodRouter};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Function name must not be empty")]
    EmptyName,

    #[error("Function already registered: {0}")]
    Duplicate(String),

    #[error("Function '{target}' is not registered (available: {available})")]
    UnknownTarget { target: String, available: String },

    #[error("No function target set and {count} functions are registered (available: {available})")]
    NoTarget { count: usize, available: String },
}

/// Registered HTTP functions, keyed by name.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, MethodRouter>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an HTTP function. The handler receives requests of every method.
    pub fn http<H, T>(&mut self, name: impl Into<String>, handler: H) -> Result<(), RegistryError>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.functions.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        tracing::debug!(function = %name, "Registered HTTP function");
        self.functions.insert(name, any(handler));
        Ok(())
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Pick the function to serve.
    ///
    /// An explicit target must be registered. Without one, the registry must
    /// hold exactly one function.
    pub fn resolve(&self, target: Option<&str>) -> Result<(String, MethodRouter), RegistryError> {
        match target {
            Some(target) => self
                .functions
                .get(target)
                .map(|function| (target.to_string(), function.clone()))
                .ok_or_else(|| RegistryError::UnknownTarget {
                    target: target.to_string(),
                    available: self.available(),
                }),
            None => {
                let mut functions = self.functions.iter();
                match (functions.next(), functions.next()) {
                    (Some((name, function)), None) => Ok((name.clone(), function.clone())),
                    _ => Err(RegistryError::NoTarget {
                        count: self.len(),
                        available: self.available(),
                    }),
                }
            }
        }
    }

    fn available(&self) -> String {
        if self.is_empty() {
            "none".to_string()
        } else {
            self.names().collect::<Vec<_>>().join(", ")
        }
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
