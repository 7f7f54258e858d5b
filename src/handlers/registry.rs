// Handler registry
//
// Holds name → handler mappings in registration order. The order matters:
// the first registered model is the router's default, and listings report
// models in the order they were declared.

use std::collections::HashMap;
use std::sync::Arc;

use super::{HandlerEntry, ModelHandler};
use crate::errors::RouterError;

/// Registry of model handlers
#[derive(Default)]
pub struct HandlerRegistry {
    entries: Vec<(String, Arc<dyn ModelHandler>)>,
    index: HashMap<String, usize>,
}

impl HandlerRegistry {
    /// Create empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an ordered topology, failing if it is empty
    pub fn from_entries<I, S>(entries: I) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = (S, HandlerEntry)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (name, entry) in entries {
            registry.register(name, entry)?;
        }

        if registry.is_empty() {
            return Err(RouterError::Configuration(
                "No models were loaded! Please register child models".to_string(),
            ));
        }

        Ok(registry)
    }

    /// Register a handler under a unique, non-empty name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        entry: HandlerEntry,
    ) -> Result<(), RouterError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RouterError::Configuration(
                "model name must not be empty".to_string(),
            ));
        }
        if self.index.contains_key(&name) {
            return Err(RouterError::Configuration(format!(
                "model {} is registered more than once",
                name
            )));
        }

        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, entry.into_handler()));
        Ok(())
    }

    /// Get handler by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ModelHandler>> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// First registered name
    pub fn first_name(&self) -> Option<&str> {
        self.entries.first().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn ModelHandler>)> {
        self.entries.iter().map(|(name, handler)| (name.as_str(), handler))
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
