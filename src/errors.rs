// Router error taxonomy
//
// Every failure the router itself produces is a RouterError. Errors raised
// by model handlers never pass through this type: do_event hands them back
// exactly as the handler returned them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    /// Router could not be built (no models, bad names, duplicates)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Body is neither a mapping, valid JSON, nor a known binary type
    #[error("Unrecognized request format: {0}")]
    UnrecognizedRequestFormat(String),

    /// Fetching a data_url failed or timed out
    #[error("failed to fetch {url}: {reason}")]
    UpstreamFetch { url: String, reason: String },

    /// Path present but not rooted at the url prefix
    #[error("illegal path prefix {path}, must start with {prefix}")]
    IllegalPathPrefix { path: String, prefix: String },

    /// Resolved model is not registered
    #[error("model {model} doesnt exist, available models: {}", .available.join("| "))]
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },
}

impl RouterError {
    /// HTTP status a host should answer with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RouterError::Configuration(_) => 500,
            RouterError::UnrecognizedRequestFormat(_) => 400,
            RouterError::UpstreamFetch { .. } => 502,
            RouterError::IllegalPathPrefix { .. } => 400,
            RouterError::ModelNotFound { .. } => 404,
        }
    }

    /// Short machine-readable kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::Configuration(_) => "configuration",
            RouterError::UnrecognizedRequestFormat(_) => "unrecognized_format",
            RouterError::UpstreamFetch { .. } => "upstream_fetch",
            RouterError::IllegalPathPrefix { .. } => "illegal_path",
            RouterError::ModelNotFound { .. } => "model_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found_lists_every_model() {
        let err = RouterError::ModelNotFound {
            model: "m3".to_string(),
            available: vec!["m1".to_string(), "m2:v1".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("m3"));
        assert!(msg.contains("m1| m2:v1"));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_illegal_prefix_names_path_and_prefix() {
        let err = RouterError::IllegalPathPrefix {
            path: "/v1/x".to_string(),
            prefix: "/v2/models".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "illegal path prefix /v1/x, must start with /v2/models"
        );
        assert_eq!(err.kind(), "illegal_path");
    }
}
