// Hosting runtime around the router
//
// The router raises; the host never does. EventHost runs post_init once,
// then turns every do_event outcome into an outbound event: successes pass
// through, failures become an error-shaped body carrying the original
// message and where it came from.

mod metrics;

pub use metrics::HostMetrics;

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

use crate::errors::RouterError;
use crate::event::{Body, Event};
use crate::router::ModelRouter;

/// Origin reported for errors raised by a model handler
pub const HANDLER_ORIGIN: &str = "handler";

/// Outbound event plus the status the transport should report
#[derive(Debug, Clone)]
pub struct HostResponse {
    pub event: Event,
    pub status: u16,
}

impl HostResponse {
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

pub struct EventHost {
    router: Arc<ModelRouter>,
    metrics: HostMetrics,
}

impl EventHost {
    /// Wrap a router, running its post-construction validation
    pub fn new(router: ModelRouter) -> Result<Self> {
        router.post_init()?;

        Ok(Self {
            router: Arc::new(router),
            metrics: HostMetrics::new()?,
        })
    }

    pub fn router(&self) -> &Arc<ModelRouter> {
        &self.router
    }

    pub fn metrics(&self) -> &HostMetrics {
        &self.metrics
    }

    pub fn render_metrics(&self) -> Result<String> {
        self.metrics.render()
    }

    /// Run one event through the router, never failing
    pub async fn process(&self, event: Event) -> HostResponse {
        let mut shell = Event::new(Body::Empty).with_path(event.path.clone());
        shell.id = event.id.clone();
        shell.method = event.method.clone();

        match self.router.do_event(event).await {
            Ok(event) => {
                self.metrics
                    .record(if event.terminated { "terminated" } else { "ok" });
                HostResponse { event, status: 200 }
            }
            Err(err) => {
                let (origin, status, outcome) = match err.downcast_ref::<RouterError>() {
                    Some(router_err) => (
                        self.router.get_metadata().name,
                        router_err.status_code(),
                        router_err.kind(),
                    ),
                    None => (HANDLER_ORIGIN.to_string(), 500, "handler_error"),
                };

                tracing::warn!(
                    event_id = %shell.id,
                    path = %shell.path,
                    origin = %origin,
                    error = %format!("{:#}", err),
                    "Request failed"
                );
                self.metrics.record(outcome);

                shell.body = Body::from(json!({
                    "error": format!("{:#}", err),
                    "origin": origin,
                }));
                shell.terminated = true;
                HostResponse {
                    event: shell,
                    status,
                }
            }
        }
    }
}
