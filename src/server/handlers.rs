// HTTP request handlers
//
// Every request except /metrics is turned into an Event and run through
// the host; the router decides what the path means.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::event::{Body, Event};
use crate::host::{EventHost, HostResponse};

/// Create the application router
pub fn create_app(host: Arc<EventHost>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_endpoint))
        .fallback(handle_event)
        .with_state(host)
}

/// Build a router Event from the parts of an HTTP request
pub fn event_from_request(method: &Method, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Event {
    let body = if body.is_empty() {
        Body::Empty
    } else {
        Body::Raw(body.to_vec())
    };

    let mut event = Event::new(body)
        .with_path(uri.path())
        .with_method(method.as_str());

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            event = event.with_header(name.as_str(), value);
        }
    }
    if let Some(content_type) = event.headers.get(header::CONTENT_TYPE.as_str()).cloned() {
        event = event.with_content_type(content_type);
    }

    event
}

/// Handle any request - route it through the model router
async fn handle_event(
    State(host): State<Arc<EventHost>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event = event_from_request(&method, &uri, &headers, body);
    let response = host.process(event).await;
    into_http_response(response)
}

fn into_http_response(response: HostResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match response.event.body {
        Body::Binary(payload) => {
            let content_type = payload
                .content_type
                .as_deref()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
                .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
            let bytes = payload.data.into_iter().next().unwrap_or_default();
            (status, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        body => (status, Json(body.to_json())).into_response(),
    }
}

/// Handle GET /metrics - Prometheus metrics endpoint
async fn metrics_endpoint(State(host): State<Arc<EventHost>>) -> Response {
    match host.render_metrics() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_request() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
        let uri: Uri = "/v2/models/m1/infer?x=1".parse().unwrap();

        let event = event_from_request(&Method::PUT, &uri, &headers, Bytes::from_static(b"\x89PNG"));

        assert_eq!(event.path, "/v2/models/m1/infer");
        assert_eq!(event.method(), "PUT");
        assert_eq!(event.content_type.as_deref(), Some("image/png"));
        assert_eq!(event.body, Body::Raw(b"\x89PNG".to_vec()));
    }

    #[test]
    fn test_empty_request_body_is_empty() {
        let uri: Uri = "/".parse().unwrap();
        let event = event_from_request(&Method::GET, &uri, &HeaderMap::new(), Bytes::new());
        assert_eq!(event.body, Body::Empty);
    }
}
