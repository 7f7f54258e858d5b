// Handler factory
//
// Creates handlers from the declared model topology

use anyhow::{Context, Result};
use std::time::Duration;

use super::{EchoHandler, HandlerEntry, RemoteModelHandler};
use crate::config::{ModelKind, ModelSpec};

/// Create the handler for one declared model
pub fn create_handler(spec: &ModelSpec) -> Result<HandlerEntry> {
    match spec.kind {
        ModelKind::Echo => Ok(HandlerEntry::handler(EchoHandler)),

        ModelKind::Remote => {
            let url = spec
                .url
                .as_deref()
                .with_context(|| format!("remote model {} is missing url", spec.name))?;
            let handler = match spec.timeout_secs {
                Some(secs) => RemoteModelHandler::with_timeout(url, Duration::from_secs(secs))?,
                None => RemoteModelHandler::new(url)?,
            };
            Ok(HandlerEntry::handler(handler))
        }
    }
}

/// Ordered `name → handler` routes for a topology
pub fn create_routes(specs: &[ModelSpec]) -> Result<Vec<(String, HandlerEntry)>> {
    specs
        .iter()
        .map(|spec| Ok((spec.name.clone(), create_handler(spec)?)))
        .collect()
}
