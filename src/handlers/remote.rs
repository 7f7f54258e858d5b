// Remote model handler
//
// Forwards the routed request to a model server over HTTP. The resolved
// sub-operation is appended to the base URL, so `infer` on a model served
// at http://host/m1 is POSTed to http://host/m1/infer.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::ModelHandler;
use crate::event::{Body, Event};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct RemoteModelHandler {
    client: Client,
    base_url: String,
}

impl RemoteModelHandler {
    /// Create a handler with the default request timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn operation_url(&self, operation: &str) -> String {
        let operation = operation.trim_matches('/');
        if operation.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, operation)
        }
    }
}

#[async_trait]
impl ModelHandler for RemoteModelHandler {
    async fn invoke(&self, event: &Event) -> Result<Option<Event>> {
        let url = self.operation_url(&event.path);
        let payload = match &event.body {
            Body::Json(map) => Value::Object(map.clone()),
            Body::Empty => Value::Object(Default::default()),
            _ => bail!("remote model at {} only accepts JSON bodies", self.base_url),
        };

        tracing::debug!(url = %url, event_id = %event.id, "Forwarding to remote model");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach remote model: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("Remote model error {}: {}", status, error_text);
        }

        let text = response
            .text()
            .await
            .context("Failed to read remote model response")?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let value: Value =
            serde_json::from_str(&text).context("Remote model returned invalid JSON")?;
        Ok(Some(event.respond(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_url() {
        let handler = RemoteModelHandler::new("http://localhost:9000/m1/").unwrap();
        assert_eq!(handler.base_url(), "http://localhost:9000/m1");
        assert_eq!(handler.operation_url("infer"), "http://localhost:9000/m1/infer");
        assert_eq!(handler.operation_url(""), "http://localhost:9000/m1");
    }

    #[tokio::test]
    async fn test_forwards_body_to_operation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/m1/explain")
            .match_body(mockito::Matcher::Json(json!({"inputs": [5]})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"outputs": [10]}"#)
            .create_async()
            .await;

        let handler = RemoteModelHandler::new(format!("{}/m1", server.url())).unwrap();
        let event = Event::new(Body::from(json!({"inputs": [5]}))).with_path("explain");
        let response = handler.invoke(&event).await.unwrap().unwrap();

        assert_eq!(response.body.to_json(), json!({"outputs": [10]}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remote_error_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/m1/infer")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let handler = RemoteModelHandler::new(format!("{}/m1", server.url())).unwrap();
        let event = Event::new(Body::Empty).with_path("infer");
        let err = handler.invoke(&event).await.unwrap_err();

        assert!(err.to_string().contains("500"));
    }
}
