// Echo handler - returns the request body, tagged with the operation

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::ModelHandler;
use crate::event::{Body, Event};

/// Responds with the routed body unchanged
///
/// Mapping bodies get an extra `operation` key holding the sub-operation
/// the router resolved, which makes routing visible end to end.
#[derive(Debug, Default, Clone)]
pub struct EchoHandler;

#[async_trait]
impl ModelHandler for EchoHandler {
    async fn invoke(&self, event: &Event) -> Result<Option<Event>> {
        let body = match &event.body {
            Body::Json(map) => {
                let mut map = map.clone();
                map.insert("operation".to_string(), Value::String(event.path.clone()));
                Body::Json(map)
            }
            other => other.clone(),
        };
        Ok(Some(event.respond(body)))
    }
}
