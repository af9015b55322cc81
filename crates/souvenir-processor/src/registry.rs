//! Handler registry.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::handler::ModuleHandler;
use crate::handlers;

/// Handlers keyed by module type id.
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn ModuleHandler>>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry holding every built-in handler.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        {
            let mut handlers = registry.handlers.write();
            for handler in handlers::builtin() {
                handlers.insert(handler.module_id().to_string(), handler);
            }
        }
        registry
    }

    /// Register a handler.
    ///
    /// Returns an error if a handler for the same module id already exists.
    pub fn add(&self, handler: Arc<dyn ModuleHandler>) -> Result<(), RegistryError> {
        let id = handler.module_id();
        let mut handlers = self.handlers.write();
        if handlers.contains_key(id) {
            return Err(RegistryError::AlreadyRegistered(id.to_string()));
        }
        handlers.insert(id.to_string(), handler);
        tracing::debug!("Registered handler: {}", id);
        Ok(())
    }

    pub fn get(&self, module_id: &str) -> Option<Arc<dyn ModuleHandler>> {
        self.handlers.read().get(module_id).cloned()
    }

    /// Registered module ids, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.handlers.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn exists(&self, module_id: &str) -> bool {
        self.handlers.read().contains_key(module_id)
    }

    pub fn count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.list())
            .finish()
    }
}
