// Model Router - request routing for model-serving hosts
// Library exports

pub mod config;
pub mod context;
pub mod errors;
pub mod event;
pub mod fetch;
pub mod handlers;
pub mod host; // Error-event conversion and request counters
pub mod router;
pub mod server; // Thin HTTP binding for EventHost

pub use context::ServingContext;
pub use errors::RouterError;
pub use event::{BinaryPayload, Body, Event};
pub use handlers::{handler_fn, HandlerEntry, ModelHandler, PipelineStep};
pub use router::ModelRouter;
