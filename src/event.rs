// Request/response envelope passed through the router
//
// The host builds one Event per inbound request; the router rewrites
// path, body and terminated in place and hands the same Event back.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Method assumed when the host did not supply one
pub const DEFAULT_METHOD: &str = "POST";

/// Binary samples collected from an image upload or a data_url download
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryPayload {
    pub data: Vec<Vec<u8>>,
    pub content_type: Option<String>,
}

impl BinaryPayload {
    /// Payload holding a single sample
    pub fn single(sample: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            data: vec![sample],
            content_type,
        }
    }
}

/// Event body
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    /// Undecoded bytes as received from the host
    Raw(Vec<u8>),
    /// Structured mapping
    Json(Map<String, Value>),
    /// Wrapped binary samples
    Binary(BinaryPayload),
}

impl Body {
    /// True for Empty and for a mapping with no keys
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Raw(bytes) => bytes.is_empty(),
            Body::Json(map) => map.is_empty(),
            Body::Binary(payload) => payload.data.is_empty(),
        }
    }

    /// Look up a top-level key of a mapping body
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Body::Json(map) => map.get(key),
            _ => None,
        }
    }

    /// Look up a top-level string field of a mapping body
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Render the body as JSON for the wire
    ///
    /// Binary samples are summarised by length; the HTTP adapter sends
    /// the bytes themselves.
    pub fn to_json(&self) -> Value {
        match self {
            Body::Empty => Value::Null,
            Body::Raw(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
            Body::Json(map) => Value::Object(map.clone()),
            Body::Binary(payload) => serde_json::json!({
                "data_len": payload.data.iter().map(Vec::len).collect::<Vec<_>>(),
                "content_type": payload.content_type,
            }),
        }
    }
}

impl From<Map<String, Value>> for Body {
    fn from(map: Map<String, Value>) -> Self {
        Body::Json(map)
    }
}

impl From<Value> for Body {
    /// Objects become mappings, null becomes Empty, anything else is kept
    /// as its serialized text so parse_event can reject it
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Body::Json(map),
            Value::Null => Body::Empty,
            other => Body::Raw(other.to_string().into_bytes()),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Raw(bytes)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Raw(text.as_bytes().to_vec())
    }
}

/// Unit of request/response exchanged with the router
#[derive(Debug, Clone)]
pub struct Event {
    pub id: String,
    pub path: String,
    pub method: Option<String>,
    pub body: Body,
    pub content_type: Option<String>,
    pub headers: HashMap<String, String>,
    /// Set by the router when downstream processing must stop
    pub terminated: bool,
    pub received_at: DateTime<Utc>,
}

impl Event {
    pub fn new(body: impl Into<Body>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            path: String::new(),
            method: None,
            body: body.into(),
            content_type: None,
            headers: HashMap::new(),
            terminated: false,
            received_at: Utc::now(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name: String = name.into();
        self.headers.insert(name.to_lowercase(), value.into());
        self
    }

    /// Request method, POST when the host left it out
    pub fn method(&self) -> &str {
        match self.method.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => DEFAULT_METHOD,
        }
    }

    /// Response event carrying `body`, sharing this event's identity
    pub fn respond(&self, body: impl Into<Body>) -> Event {
        let mut response = self.clone();
        response.body = body.into();
        response
    }
}
