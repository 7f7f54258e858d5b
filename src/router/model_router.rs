// Model router
//
// Turns one inbound Event into one outbound Event:
//   preprocess → health check → parse body → prefix check
//   → resolve route → invoke handler → postprocess
// The only state is the handler registry, fixed at construction, so
// concurrent do_event calls need no locking.

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::Instrument;

use super::hooks::{EventHook, IdentityHook};
use super::path::{parse_route_path, PathRoute};
use crate::config::RouterConfig;
use crate::context::ServingContext;
use crate::errors::RouterError;
use crate::event::{BinaryPayload, Body, Event};
use crate::handlers::{HandlerEntry, HandlerRegistry, ModelHandler};

/// Protocol version reported in metadata
pub const PROTOCOL_VERSION: &str = "v2";

/// Operation used when neither the path nor the body names one
pub const DEFAULT_OPERATION: &str = "infer";

const DATA_URL_KEY: &str = "data_url";
const MODEL_KEY: &str = "model";
const OPERATION_KEY: &str = "operation";

/// Router/host details returned by health checks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterMetadata {
    pub name: String,
    pub version: String,
    pub extensions: Vec<String>,
}

impl RouterMetadata {
    pub fn to_body(&self) -> Body {
        Body::from(json!({
            "name": self.name,
            "version": self.version,
            "extensions": self.extensions,
        }))
    }
}

/// Outcome of route resolution
#[derive(Clone)]
pub enum RouteResolution {
    /// No model addressed: answer with the model list
    List,
    Model {
        name: String,
        handler: Arc<dyn ModelHandler>,
        operation: String,
    },
}

impl std::fmt::Debug for RouteResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteResolution::List => write!(f, "List"),
            RouteResolution::Model {
                name, operation, ..
            } => f
                .debug_struct("Model")
                .field("name", name)
                .field("operation", operation)
                .finish_non_exhaustive(),
        }
    }
}

pub struct ModelRouter {
    context: ServingContext,
    registry: HandlerRegistry,
    config: RouterConfig,
    hook: Arc<dyn EventHook>,
}

impl ModelRouter {
    /// Build a router from an ordered `name → handler` topology
    ///
    /// Fails with a configuration error when no models are registered.
    pub fn new<I, S>(context: ServingContext, routes: I, config: RouterConfig) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = (S, HandlerEntry)>,
        S: Into<String>,
    {
        let registry = HandlerRegistry::from_entries(routes)?;

        Ok(Self {
            context,
            registry,
            config,
            hook: Arc::new(IdentityHook),
        })
    }

    /// Install pre/post processing hooks
    pub fn with_hook(mut self, hook: impl EventHook + 'static) -> Self {
        self.hook = Arc::new(hook);
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn context(&self) -> &ServingContext {
        &self.context
    }

    /// Verify models are loaded; called by the host once after construction
    pub fn post_init(&self) -> Result<(), RouterError> {
        if self.registry.is_empty() {
            return Err(RouterError::Configuration(
                "No models were loaded! Please register child models".to_string(),
            ));
        }

        self.context.span.in_scope(|| {
            tracing::info!(models = ?self.registry.names(), "Loaded models");
        });
        Ok(())
    }

    /// Return the model router/host details
    pub fn get_metadata(&self) -> RouterMetadata {
        RouterMetadata {
            name: self.config.name.clone(),
            version: PROTOCOL_VERSION.to_string(),
            extensions: Vec::new(),
        }
    }

    /// GET on "/" or under the health prefix
    pub fn is_health_check(&self, event: &Event) -> bool {
        event.method().eq_ignore_ascii_case("GET")
            && (event.path == "/" || event.path.starts_with(&self.config.health_prefix))
    }

    /// Decode the event body into a structured body
    ///
    /// Mappings pass through unchanged. Raw bytes are decoded as a JSON
    /// object; if that fails and the content type is binary the bytes are
    /// wrapped as a single data sample. A mapping with a `data_url` is
    /// replaced by the fetched resource.
    pub async fn parse_event(&self, event: &Event) -> Result<Body, RouterError> {
        let map = match &event.body {
            Body::Json(map) => map.clone(),
            Body::Empty | Body::Binary(_) => return Ok(event.body.clone()),
            Body::Raw(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                return Ok(Body::Empty)
            }
            Body::Raw(bytes) => match decode_json_object(bytes) {
                Ok(map) => map,
                Err(reason) => {
                    return match event.content_type.as_deref() {
                        Some(ct) if self.config.is_binary_content_type(ct) => Ok(Body::Binary(
                            BinaryPayload::single(bytes.clone(), Some(ct.to_string())),
                        )),
                        _ => Err(RouterError::UnrecognizedRequestFormat(reason)),
                    };
                }
            },
        };

        match map.get(DATA_URL_KEY) {
            None => Ok(Body::Json(map)),
            Some(Value::String(url)) => {
                let data = self.fetch_data_url(url).await?;
                Ok(Body::Binary(BinaryPayload::single(data, None)))
            }
            Some(other) => Err(RouterError::UnrecognizedRequestFormat(format!(
                "data_url must be a string, got {}",
                other
            ))),
        }
    }

    async fn fetch_data_url(&self, url: &str) -> Result<Vec<u8>, RouterError> {
        tracing::debug!(url = %url, "downloading data");

        let timeout = self.config.fetch_timeout();
        match tokio::time::timeout(timeout, self.context.fetcher.fetch(url)).await {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(e)) => Err(RouterError::UpstreamFetch {
                url: url.to_string(),
                reason: format!("{:#}", e),
            }),
            Err(_) => Err(RouterError::UpstreamFetch {
                url: url.to_string(),
                reason: format!("timed out after {:?}", timeout),
            }),
        }
    }

    /// Pick the handler and sub-operation for a parsed body and path
    pub fn resolve_route(&self, body: &Body, path: &str) -> Result<RouteResolution, RouterError> {
        let (model, operation) = match parse_route_path(path, &self.config.url_prefix) {
            PathRoute::Listing => return Ok(RouteResolution::List),
            PathRoute::Unspecified if body.is_empty() => return Ok(RouteResolution::List),
            PathRoute::Unspecified => (None, None),
            route => (route.model_key(), route.operation().map(str::to_string)),
        };

        let model = match model {
            Some(model) => model,
            None => body_string(body, MODEL_KEY)?
                .or_else(|| self.registry.first_name().map(str::to_string))
                .unwrap_or_default(),
        };
        let operation = match operation {
            Some(operation) => operation,
            None => body_string(body, OPERATION_KEY)?
                .unwrap_or_else(|| DEFAULT_OPERATION.to_string()),
        };

        match self.registry.get(&model) {
            Some(handler) => Ok(RouteResolution::Model {
                handler: Arc::clone(handler),
                name: model,
                operation,
            }),
            None => Err(RouterError::ModelNotFound {
                model,
                available: self.registry.names(),
            }),
        }
    }

    /// Handle one incoming event
    ///
    /// Router failures come back as `RouterError` inside the anyhow error.
    /// Handler failures are returned exactly as the handler produced them.
    pub async fn do_event(&self, event: Event) -> Result<Event> {
        self.dispatch(event)
            .instrument(self.context.span.clone())
            .await
    }

    async fn dispatch(&self, event: Event) -> Result<Event> {
        let mut event = self.hook.preprocess(event)?;

        if self.is_health_check(&event) {
            event.terminated = true;
            event.body = self.get_metadata().to_body();
            return Ok(event);
        }

        event.body = self.parse_event(&event).await?;

        if !event.path.is_empty() && !event.path.starts_with(&self.config.url_prefix) {
            return Err(RouterError::IllegalPathPrefix {
                path: event.path.clone(),
                prefix: self.config.url_prefix.clone(),
            }
            .into());
        }

        let event = self.route(event).await?;
        self.hook.postprocess(event)
    }

    async fn route(&self, mut event: Event) -> Result<Event> {
        match self.resolve_route(&event.body, &event.path)? {
            RouteResolution::List => {
                event.terminated = true;
                event.body = Body::from(json!({ "models": self.registry.names() }));
                Ok(event)
            }
            RouteResolution::Model {
                name,
                handler,
                operation,
            } => {
                tracing::debug!(
                    model = %name,
                    operation = %operation,
                    event_id = %event.id,
                    "router run model"
                );

                event.path = operation;
                let response = handler.invoke(&event).await?;
                event.body = response.map(|r| r.body).unwrap_or_default();
                Ok(event)
            }
        }
    }
}

/// String field of a mapping body; present but non-string is a format error
fn body_string(body: &Body, key: &str) -> Result<Option<String>, RouterError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(RouterError::UnrecognizedRequestFormat(format!(
            "{} must be a string, got {}",
            key,
            json_kind(other)
        ))),
    }
}

fn decode_json_object(bytes: &[u8]) -> Result<serde_json::Map<String, Value>, String> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
