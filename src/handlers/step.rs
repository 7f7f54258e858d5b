// Adapter from the pipeline-step contract to ModelHandler

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::{ModelHandler, PipelineStep};
use crate::event::Event;

/// Invokes a PipelineStep's `run` with a copy of the routed event
pub struct StepHandler {
    step: Arc<dyn PipelineStep>,
}

impl StepHandler {
    pub fn new(step: Arc<dyn PipelineStep>) -> Self {
        Self { step }
    }
}

#[async_trait]
impl ModelHandler for StepHandler {
    async fn invoke(&self, event: &Event) -> Result<Option<Event>> {
        self.step.run(event.clone()).await.map(Some)
    }
}
