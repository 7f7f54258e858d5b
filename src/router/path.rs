// Model path grammar
//
// <prefix>[/<model>[/versions/<version>][/<operation>...]]
//
// The part after the url prefix is split on '/' into segments (empty
// segments from doubled or trailing slashes are dropped) and classified
// by a small state machine:
//
//   Start      --model-->                AfterModel
//   AfterModel --"versions" <version>--> AfterVersion
//   AfterModel --anything else-->        operation segments
//   AfterVersion --rest-->               operation segments
//
// "versions" only opens a version when a version segment follows it;
// `/m/versions` is model `m` with operation `versions`.

const VERSIONS_SEGMENT: &str = "versions";

/// Classification of a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRoute {
    /// No path at all; the body and defaults decide
    Unspecified,
    /// Only the prefix was given: list the models
    Listing,
    /// A model was addressed explicitly
    Model {
        model: String,
        version: Option<String>,
        operation: Option<String>,
    },
}

impl PathRoute {
    /// Registry key for an explicit model route (`model` or `model:version`)
    pub fn model_key(&self) -> Option<String> {
        match self {
            PathRoute::Model {
                model,
                version: Some(version),
                ..
            } => Some(format!("{}:{}", model, version)),
            PathRoute::Model { model, .. } => Some(model.clone()),
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<&str> {
        match self {
            PathRoute::Model { operation, .. } => operation.as_deref(),
            _ => None,
        }
    }
}

/// Non-empty '/'-delimited segments of `path`
pub fn tokenize(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

enum State {
    Start,
    AfterModel,
    AfterVersion,
}

/// Classify a path already known to start with `url_prefix`
///
/// An empty `path` is `Unspecified`; a path that is only the prefix
/// (with or without slashes) is `Listing`.
pub fn parse_route_path(path: &str, url_prefix: &str) -> PathRoute {
    if path.is_empty() {
        return PathRoute::Unspecified;
    }

    let rest = path.strip_prefix(url_prefix).unwrap_or(path);
    let segments = tokenize(rest);

    let mut state = State::Start;
    let mut model = None;
    let mut version = None;
    let mut i = 0;

    while i < segments.len() {
        match state {
            State::Start => {
                model = Some(segments[i].to_string());
                state = State::AfterModel;
                i += 1;
            }
            State::AfterModel => {
                if segments[i] == VERSIONS_SEGMENT && i + 1 < segments.len() {
                    version = Some(segments[i + 1].to_string());
                    state = State::AfterVersion;
                    i += 2;
                } else {
                    break;
                }
            }
            State::AfterVersion => break,
        }
    }

    let Some(model) = model else {
        return PathRoute::Listing;
    };

    let operation = if i < segments.len() {
        Some(segments[i..].join("/"))
    } else {
        None
    };

    PathRoute::Model {
        model,
        version,
        operation,
    }
}
