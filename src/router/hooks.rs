// Pre/post processing hooks around dispatch

use anyhow::Result;

use crate::event::Event;

/// Extension point run before parsing and after invocation
///
/// Both methods default to identity. A preprocess error aborts the request
/// before any parsing or routing happens.
pub trait EventHook: Send + Sync {
    fn preprocess(&self, event: Event) -> Result<Event> {
        Ok(event)
    }

    fn postprocess(&self, event: Event) -> Result<Event> {
        Ok(event)
    }
}

/// Hook that leaves events untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityHook;

impl EventHook for IdentityHook {}
