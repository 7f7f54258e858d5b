// Integration tests for data_url bodies
//
// A body carrying `data_url` is replaced by the bytes behind the URL.
// Downloads go through a real HTTP fetcher against a mockito server.

use anyhow::Result;
use async_trait::async_trait;
use model_router::config::RouterConfig;
use model_router::fetch::{HttpFetcher, ResourceFetcher};
use model_router::{handler_fn, Body, Event, ModelRouter, RouterError, ServingContext};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn router_with(fetcher: Arc<dyn ResourceFetcher>, config: RouterConfig) -> ModelRouter {
    ModelRouter::new(
        ServingContext::with_fetcher("test", fetcher),
        vec![("vision", handler_fn(|e| Ok(Some(e.clone()))))],
        config,
    )
    .unwrap()
}

fn http_router() -> ModelRouter {
    router_with(Arc::new(HttpFetcher::new().unwrap()), RouterConfig::default())
}

#[tokio::test]
async fn test_data_url_is_downloaded_and_wrapped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/images/cat.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(vec![0xffu8, 0xd8, 0xff, 0xe0])
        .create_async()
        .await;

    let router = http_router();
    let url = format!("{}/images/cat.jpg", server.url());
    let event = Event::new(json!({"data_url": url, "ignored": 1})).with_path("/v2/models/vision/infer");
    let event = router.do_event(event).await.unwrap();

    match event.body {
        Body::Binary(payload) => assert_eq!(payload.data, vec![vec![0xffu8, 0xd8, 0xff, 0xe0]]),
        other => panic!("Expected binary body, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_data_url_in_json_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/sample")
        .with_status(200)
        .with_body("abc")
        .create_async()
        .await;

    let router = http_router();
    let text = format!(r#"{{"data_url": "{}/sample"}}"#, server.url());
    let body = router.parse_event(&Event::new(text.as_str())).await.unwrap();

    assert_eq!(body, Body::Binary(model_router::BinaryPayload::single(b"abc".to_vec(), None)));
}

#[tokio::test]
async fn test_failed_download_is_upstream_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/gone")
        .with_status(404)
        .create_async()
        .await;

    let router = http_router();
    let url = format!("{}/gone", server.url());
    let err = router
        .do_event(Event::new(json!({"data_url": url.clone()})).with_path("/v2/models/vision/infer"))
        .await
        .unwrap_err();

    match err.downcast_ref::<RouterError>() {
        Some(RouterError::UpstreamFetch { url: failed, reason }) => {
            assert_eq!(failed, &url);
            assert!(reason.contains("404"));
        }
        other => panic!("Expected UpstreamFetch, got {:?}", other),
    }
}

struct SlowFetcher;

#[async_trait]
impl ResourceFetcher for SlowFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![1])
    }
}

#[tokio::test]
async fn test_slow_download_times_out() {
    let config = RouterConfig::default().with_fetch_timeout(Duration::from_secs(1));
    let router = router_with(Arc::new(SlowFetcher), config);

    let err = router
        .parse_event(&Event::new(json!({"data_url": "http://slow.invalid/x"})))
        .await
        .unwrap_err();

    match err {
        RouterError::UpstreamFetch { reason, .. } => assert!(reason.contains("timed out")),
        other => panic!("Expected UpstreamFetch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_context_fetcher_uses_configured_timeout() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/slow.bin")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(1500));
            w.write_all(b"late")
        })
        .create_async()
        .await;

    // The client bound is 200ms while the router allows 10s, so only the
    // context's own timeout can cut this download short.
    let config = RouterConfig::default().with_fetch_timeout(Duration::from_secs(10));
    let router = ModelRouter::new(
        ServingContext::new("test", Duration::from_millis(200)).unwrap(),
        vec![("vision", handler_fn(|e| Ok(Some(e.clone()))))],
        config,
    )
    .unwrap();

    let url = format!("{}/slow.bin", server.url());
    let err = router
        .parse_event(&Event::new(json!({ "data_url": url })))
        .await
        .unwrap_err();

    match err {
        RouterError::UpstreamFetch { reason, .. } => {
            assert!(!reason.contains("timed out after"), "router bound fired: {}", reason)
        }
        other => panic!("Expected UpstreamFetch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_string_data_url_is_rejected() {
    let router = http_router();
    let err = router
        .parse_event(&Event::new(json!({"data_url": 42})))
        .await
        .unwrap_err();

    assert!(matches!(err, RouterError::UnrecognizedRequestFormat(_)));
}

#[tokio::test]
async fn test_offline_context_refuses_data_urls() {
    let router = ModelRouter::new(
        ServingContext::offline("test"),
        vec![("vision", handler_fn(|_| Ok(None)))],
        RouterConfig::default(),
    )
    .unwrap();

    let err = router
        .parse_event(&Event::new(json!({"data_url": "http://example.com/x"})))
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::UpstreamFetch { .. }));
}
