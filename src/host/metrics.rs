// Request counters for the hosting runtime

use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub struct HostMetrics {
    registry: Registry,
    requests: IntCounterVec,
}

impl HostMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new(
                "model_router_requests_total",
                "Requests handled by the model router, by outcome",
            ),
            &["outcome"],
        )
        .context("Failed to create request counter")?;

        registry
            .register(Box::new(requests.clone()))
            .context("Failed to register request counter")?;

        Ok(Self { registry, requests })
    }

    pub fn record(&self, outcome: &str) {
        self.requests.with_label_values(&[outcome]).inc();
    }

    pub fn count(&self, outcome: &str) -> u64 {
        self.requests.with_label_values(&[outcome]).get()
    }

    /// Prometheus text exposition of all counters
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics are not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_render() {
        let metrics = HostMetrics::new().unwrap();
        metrics.record("ok");
        metrics.record("ok");
        metrics.record("model_not_found");

        assert_eq!(metrics.count("ok"), 2);
        let text = metrics.render().unwrap();
        assert!(text.contains("model_router_requests_total{outcome=\"ok\"} 2"));
        assert!(text.contains("model_router_requests_total{outcome=\"model_not_found\"} 1"));
    }
}
