// Model handlers
//
// A handler is anything the router can dispatch an Event to. Objects that
// follow the pipeline-step contract (a `run` entry point that consumes and
// returns the event) are adapted into handlers when they are registered,
// so the registry only ever stores ModelHandler trait objects.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::event::Event;

mod echo;
mod factory;
mod registry;
mod remote;
mod step;

pub use echo::EchoHandler;
pub use factory::{create_handler, create_routes};
pub use registry::HandlerRegistry;
pub use remote::RemoteModelHandler;
pub use step::StepHandler;

/// Trait for model handlers
///
/// `invoke` receives the routed event (its `path` already rewritten to the
/// resolved sub-operation). Returning `Ok(None)` means the handler produced
/// no response; the router then leaves the body empty. Errors are passed
/// back to the caller untouched.
#[async_trait]
pub trait ModelHandler: Send + Sync {
    async fn invoke(&self, event: &Event) -> Result<Option<Event>>;
}

/// Pipeline-step contract: consume the event, return the processed event
#[async_trait]
pub trait PipelineStep: Send + Sync {
    async fn run(&self, event: Event) -> Result<Event>;
}

/// What a model name is registered with
#[derive(Clone)]
pub enum HandlerEntry {
    /// Invoked directly
    Handler(Arc<dyn ModelHandler>),
    /// Invoked through its `run` entry point
    Step(Arc<dyn PipelineStep>),
}

impl HandlerEntry {
    pub fn handler(handler: impl ModelHandler + 'static) -> Self {
        HandlerEntry::Handler(Arc::new(handler))
    }

    pub fn step(step: impl PipelineStep + 'static) -> Self {
        HandlerEntry::Step(Arc::new(step))
    }

    /// Uniformly invokable form of this entry
    pub fn into_handler(self) -> Arc<dyn ModelHandler> {
        match self {
            HandlerEntry::Handler(handler) => handler,
            HandlerEntry::Step(step) => Arc::new(StepHandler::new(step)),
        }
    }
}

/// Handler backed by a synchronous closure
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F> ModelHandler for FnHandler<F>
where
    F: Fn(&Event) -> Result<Option<Event>> + Send + Sync,
{
    async fn invoke(&self, event: &Event) -> Result<Option<Event>> {
        (self.f)(event)
    }
}

/// Wrap a closure as a registrable handler
pub fn handler_fn<F>(f: F) -> HandlerEntry
where
    F: Fn(&Event) -> Result<Option<Event>> + Send + Sync + 'static,
{
    HandlerEntry::handler(FnHandler { f })
}
