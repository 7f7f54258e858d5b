// Router module
// Request interpretation, model selection and dispatch

mod hooks;
mod model_router;
pub mod path;

pub use hooks::{EventHook, IdentityHook};
pub use model_router::{
    ModelRouter, RouteResolution, RouterMetadata, DEFAULT_OPERATION, PROTOCOL_VERSION,
};
pub use path::PathRoute;
